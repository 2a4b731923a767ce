//! Diesel schema for API key persistence.

diesel::table! {
    /// Issued API keys, stored by digest.
    api_keys (id) {
        /// Internal key identifier.
        id -> Uuid,
        /// Hex-encoded SHA-256 digest of the key.
        #[max_length = 64]
        key_digest -> Varchar,
        /// Free-form description.
        description -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last successful authentication.
        last_used_at -> Nullable<Timestamptz>,
    }
}
