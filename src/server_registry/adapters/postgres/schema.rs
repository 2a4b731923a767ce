//! Diesel schema for server registry persistence.

diesel::table! {
    /// Registered Docker daemon endpoints.
    docker_servers (id) {
        /// Internal server identifier.
        id -> Uuid,
        /// Unique human-readable server name.
        #[max_length = 100]
        name -> Varchar,
        /// Daemon host URI.
        #[max_length = 255]
        host -> Varchar,
        /// Optional free-form description.
        description -> Nullable<Text>,
        /// Whether this row is the registry default.
        is_default -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
