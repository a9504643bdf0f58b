//! Diesel table definitions for the commerce record tables.
//!
//! These must match `migrations/` exactly; regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Canonical orders, unique on the platform's `order_id`.
    orders (id) {
        id -> Uuid,
        order_id -> Int8,
        status -> Nullable<Text>,
        currency -> Nullable<Text>,
        total -> Nullable<Numeric>,
        subtotal -> Nullable<Numeric>,
        discount_total -> Nullable<Numeric>,
        total_tax -> Nullable<Numeric>,
        shipping_total -> Nullable<Numeric>,
        payment_method -> Nullable<Text>,
        payment_method_title -> Nullable<Text>,
        transaction_id -> Nullable<Text>,
        customer_id -> Nullable<Int8>,
        customer_email -> Nullable<Text>,
        customer_name -> Nullable<Text>,
        customer_phone -> Nullable<Text>,
        customer_note -> Nullable<Text>,
        billing -> Nullable<Jsonb>,
        shipping -> Nullable<Jsonb>,
        line_items -> Jsonb,
        fee_lines -> Jsonb,
        coupon_lines -> Jsonb,
        meta_data -> Nullable<Jsonb>,
        created_at -> Nullable<Timestamptz>,
        modified_at -> Nullable<Timestamptz>,
        date_paid -> Nullable<Timestamptz>,
        date_completed -> Nullable<Timestamptz>,
        source -> Text,
        raw_payload -> Jsonb,
        /// Store bookkeeping stamp, refreshed on every upsert.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Canonical bookings, unique on the platform's `booking_id`.
    bookings (id) {
        id -> Uuid,
        booking_id -> Int8,
        status -> Nullable<Text>,
        product_id -> Nullable<Int8>,
        resource_id -> Nullable<Int8>,
        /// Platform order reference; not a foreign key.
        order_id -> Nullable<Int8>,
        order_item_id -> Nullable<Int8>,
        parent_id -> Nullable<Int8>,
        customer_id -> Nullable<Int8>,
        start_at -> Nullable<Timestamptz>,
        end_at -> Nullable<Timestamptz>,
        all_day -> Bool,
        timezone -> Nullable<Text>,
        persons -> Nullable<Int4>,
        persons_detail -> Nullable<Jsonb>,
        cost -> Nullable<Numeric>,
        created_at -> Nullable<Timestamptz>,
        modified_at -> Nullable<Timestamptz>,
        product_name -> Nullable<Text>,
        metadata -> Nullable<Jsonb>,
        source -> Text,
        raw_payload -> Jsonb,
        /// Store bookkeeping stamp, refreshed on every upsert.
        updated_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(orders, bookings);
