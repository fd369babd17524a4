pub mod affiliate;
pub mod authorizable;
pub mod authorization;
pub mod categorizable;
pub mod category;
pub mod client;
pub mod country;
pub mod localable;
pub mod locale;
pub mod location;
pub mod openai_prompt;
pub mod page;
pub mod page_instance;
pub mod page_type;
pub mod question;
pub mod question_instance;
pub mod questionnaire;
pub mod response;
pub mod tag;
pub mod taggable;
pub mod user;
pub mod widget;
pub mod widget_instance;
pub mod widget_type;
