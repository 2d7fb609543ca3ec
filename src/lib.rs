//! Dara Local CLI
//!
//! XRD相同定ジョブをバックエンドに投稿し、状態・診断・解候補を端末で確認する

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod render;
pub mod upload;
