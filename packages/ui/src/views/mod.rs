mod auth;
pub use auth::{LoginForm, LoginPage, RegisterForm, RegisterPage};

mod error;
pub use error::{ErrorPage, UnauthorizedPage, NOT_FOUND_VARIANTS};

mod home;
pub use home::{IndexPage, UPLOAD_FIELD};

mod pages;
pub use pages::{AboutPage, ContactForm, ContactPage, FaqPage};

mod predict;
pub use predict::{DetectionRow, PredictPage, PredictionView, ScoreRow, ScoreTable};

mod profile;
pub use profile::ProfilePage;

mod records;
pub use records::{RecordPage, RecordView, RecordsPage};
