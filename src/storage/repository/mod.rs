pub mod authorization_repo;
pub mod lookup_repo;
pub mod morph;
pub mod question_repo;
pub mod questionnaire_repo;
pub mod soft_delete;
pub mod widget_repo;

pub use authorization_repo::AuthorizationRepository;
pub use lookup_repo::LookupRepository;
pub use morph::{MorphRepository, MorphType, Morphable};
pub use question_repo::{QuestionRepository, QuestionRevision};
pub use questionnaire_repo::{
    accepts_responses_at, BalanceType, PromptDefinition, QuestionFlags, QuestionnaireDefinition,
    QuestionnaireRepository,
};
pub use soft_delete::{find_live, live, restore, soft_delete, SoftDeletes};
pub use widget_repo::{WidgetDefinition, WidgetRepository, WidgetRevision};
