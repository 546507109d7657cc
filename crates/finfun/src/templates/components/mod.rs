pub mod modals;
pub mod navbar;
pub mod notice;
pub mod tabs;

pub use modals::{join_modal, referral_prompt_modal};
pub use navbar::{navbar, NavItem};
pub use notice::{error_notice, load_failed, success_notice};
pub use tabs::{circle_tabs, square_tabs, Tab};
