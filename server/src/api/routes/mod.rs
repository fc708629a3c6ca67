pub mod health;
pub mod pageviews;
