//! # passive-ftp
//!
//! Client-side FTP protocol engine:
//!   • Long-lived control connection with bounded, deadline-guarded reads
//!   • Per-operation EPSV data channels, opened and closed around one transfer
//!   • Session gating (connected → authenticated) for every operation
//!   • Listing, directory navigation, rename, delete, upload, download

pub mod ftp;
