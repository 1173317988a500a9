//! Test doubles shared by the unit tests

use thicket_graph::ThingId;
use thicket_template::{Template, TemplateError, TemplateRepository};

mockall::mock! {
    pub(crate) Templates {}

    impl TemplateRepository for Templates {
        fn find_by_id(&self, id: &ThingId) -> Result<Option<Template>, TemplateError>;
        fn find_by_target_class(&self, class: &ThingId) -> Result<Option<ThingId>, TemplateError>;
    }
}
