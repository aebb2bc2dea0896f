use folio_core_contact_impl::ContactFeatureServiceImpl;
use folio_core_health_impl::HealthFeatureServiceImpl;
use folio_email_impl::EmailServiceImpl;
use folio_shared_impl::time::TimeServiceImpl;
use folio_templates_impl::TemplateServiceImpl;

// API
pub type RestServer = folio_api_rest::RestServer<HealthFeature, ContactFeature>;

// Core
pub type ContactFeature = ContactFeatureServiceImpl<Time, Email, Template>;
pub type HealthFeature = HealthFeatureServiceImpl<Time, Email>;

// Email
pub type Email = EmailServiceImpl;

// Shared
pub type Time = TimeServiceImpl;

// Templates
pub type Template = TemplateServiceImpl;
