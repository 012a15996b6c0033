pub mod catalog;
pub mod component;
pub mod diagnostics;
pub mod lint;
pub mod question;
pub mod report;
pub mod resolve;
pub mod shapes;
pub mod template;
