pub(crate) mod auth_form;
pub(crate) mod error_banner;
pub(crate) mod policy_form;
pub(crate) mod policy_list;

pub use auth_form::AuthForm;
pub use error_banner::ErrorBanner;
pub use policy_form::PolicyForm;
pub use policy_list::PolicyList;
