pub mod account;
pub mod activities;
pub mod competition_detail;
pub mod competitions;
pub mod dashboard;
pub mod quests;
pub mod settings;

pub use account::{account_page, withdraw_confirm, withdraw_done, withdraw_form};
pub use activities::activities_page;
pub use competition_detail::{competition_detail_page, detail_section, DetailSection};
pub use competitions::{competitions_page, ListingPage};
pub use dashboard::{dashboard_page, not_found_page};
pub use quests::{quest_item, quests_page, QuestTab, QuestsPage};
pub use settings::{
    notification_settings_page, referral_settings_page, settings_page, FormNotice,
    ReferralSettings,
};
