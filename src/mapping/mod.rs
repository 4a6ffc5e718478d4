pub mod command;
pub mod motion;
pub mod poller;
pub mod translator;
