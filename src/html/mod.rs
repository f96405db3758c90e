//! HTML generation
//!
//! Provides the interstitial page served when launching xAPI packages.

mod launch_page;

pub use launch_page::{render_launch_page, XapiLaunchParams};
