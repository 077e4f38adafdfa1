pub mod cli {
    pub mod parser;
}
pub mod config;
pub mod detector;
pub mod error;
pub mod github {
    pub mod client;
    pub mod event;
    pub mod fetch;
    pub mod issues;
}
pub mod logging;
pub mod output;
pub mod report;
pub mod run;
pub mod similarity;
pub mod vectorizer;
