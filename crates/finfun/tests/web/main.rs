mod account_test;
mod helpers;
mod join_test;
mod listing_test;
mod referral_test;
