//! envsync - Push local configuration into a Convex deployment.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── context       # Config + credentials + store for a command
//! │   ├── sync          # Bulk sync from a .env file
//! │   ├── secrets       # set/get/list single values
//! │   ├── keys          # Signing key generation
//! │   ├── whoami        # Show resolved target
//! │   ├── output        # Terminal styling helpers
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── config        # .envsync.toml management
//!     ├── credentials/  # Local vs cloud credential resolution
//!     ├── env           # .env file parsing
//!     ├── store/        # Remote store backends
//!     │   ├── mod       # RemoteStore trait
//!     │   ├── http      # Deployment HTTP API
//!     │   ├── cli       # Deployment CLI
//!     │   └── memory    # In-process store
//!     ├── sync          # Sync orchestrator and dry-run plan
//!     └── keys          # RSA key pair + JWKS generation
//! ```
//!
//! # Features
//!
//! - Explicit credential mode; ambiguous environments fail before any call
//! - Per-key sync with partial-failure reporting
//! - Values never interpreted as flags by the remote tooling
//! - Signing keys excluded from bulk sync and provisioned separately

pub mod cli;
pub mod core;
pub mod error;
