//! Pawtrack reminder/calendar server - integration test support.
//!
//! This crate re-exports the workspace crates to support integration tests
//! that use `pawtrack::` paths.

#![allow(ambiguous_glob_reexports)]

pub mod component {
    // Re-export core and service modules at the component level
    pub use pawtrack_core::*;
    pub use pawtrack_service::*;

    // Re-export the store crate with all its public modules
    pub mod store {
        pub use pawtrack_store::*;
    }

    // Re-export app middleware and handlers
    pub mod middleware {
        pub use pawtrack_app::middleware::*;
    }

    // Re-export config from both core and app
    pub mod config {
        pub use pawtrack_app::config::ConfigHandler;
        pub use pawtrack_core::config::*;
    }
}

// Re-export top-level modules for convenience
pub mod app {
    pub use pawtrack_app::*;

    pub mod api {
        pub use pawtrack_app::api::*;
    }
}
