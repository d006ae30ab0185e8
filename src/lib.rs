pub mod config;
pub mod contact;
pub mod html;
pub mod i18n;
pub mod images;
pub mod presentation;
pub mod qa;
pub mod retry;
pub mod site;
