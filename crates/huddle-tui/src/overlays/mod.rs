//! Modal overlays for the TUI.
//!
//! Overlays take over keyboard input while open. Their visibility is owned by
//! the `UiStore` flags; these modules only hold form state, key handling and
//! rendering.
//!
//! ## Module Structure
//!
//! - `auth.rs`: Register/Login forms
//! - `profile.rs`: profile settings modal
//! - `render_utils.rs`: shared rendering utilities for overlays

pub mod auth;
pub mod profile;
pub mod render_utils;

pub use auth::{AuthAction, AuthFormsState, render_auth_overlay};
pub use profile::{handle_profile_key, render_profile_overlay};
