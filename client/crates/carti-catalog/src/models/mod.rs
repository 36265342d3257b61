pub mod banner;
pub mod category;
pub mod dynamic_tab;
pub mod featured;
pub mod food_item;
pub mod home_feed;
pub mod product;
pub mod tab_data;
