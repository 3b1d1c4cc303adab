//! Report Designer - visual report template authoring
//!
//! The editing model behind the report template builder: element factory,
//! canvas engine (regions, selection, drag), properties panel, and the
//! session that persists templates and requests previews/exports through
//! [`report_client::ReportApi`].

pub mod access;
pub mod canvas;
pub mod config;
pub mod error;
pub mod factory;
pub mod library;
pub mod logger;
pub mod notification;
pub mod properties;
pub mod session;

pub use access::{AccessPolicy, AllowAll, Permission, PermissionSet};
pub use canvas::{CanvasEngine, CoordinateTransform, Direction, ElementPatch, PanelTab, Region, Selection};
pub use config::DesignerConfig;
pub use error::{DesignerError, DesignerResult};
pub use factory::create_element;
pub use library::TemplateLibrary;
pub use notification::{Notice, NoticeLevel, Notifier};
pub use properties::{ContentForm, ImageInputMode, ImageUpload, PanelView, PropertiesPanel};
pub use session::{EditorSession, Navigation, TemplateRoute};
