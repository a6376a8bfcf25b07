//! Application-wide constants
//!
//! Element ids, class names and attribute names shared by the page builder,
//! the interaction layer and the serializer. Templates and lookups must agree
//! on these, so they live in one place.

/// Stable element ids of the page skeleton
pub mod ids {
    /// Outer container; drags are restricted to its rectangle
    pub const CONTENT: &str = "content";

    /// Sidebar holding the type chips; also the delete dropzone
    pub const SIDEBAR: &str = "sidebar";

    /// Workspace holding table instances
    pub const WORKSPACE: &str = "workspace";

    /// Hidden holder for the object templates
    pub const TEMPLATES: &str = "templates";

    /// Draggable chip that creates tables
    pub const TABLE_TYPE: &str = "obj-type-table";

    /// Draggable chip that creates fields
    pub const FIELD_TYPE: &str = "obj-type-field";

    /// Template whose first child is the table prototype
    pub const TABLE_TEMPLATE: &str = "obj-type-table-template";

    /// Template whose first child is the field prototype
    pub const FIELD_TEMPLATE: &str = "obj-type-field-template";
}

/// Class names used for tagging and visual state
pub mod classes {
    pub const OBJECT_TYPE: &str = "obj-type";
    pub const OBJECT_INSTANCE: &str = "obj-instance";
    pub const TABLE_INSTANCE: &str = "obj-instance-table";
    pub const FIELD_INSTANCE: &str = "obj-instance-field";
    pub const TABLE_FIELDS: &str = "obj-instance-table-fields";
    pub const TABLE_SETTINGS: &str = "obj-instance-table-settings";
    pub const FIELD_SETTINGS: &str = "obj-instance-field-settings";
    pub const DROPZONE: &str = "dropzone";

    pub const OVERLAY: &str = "overlay";
    pub const OVERLAY_CONTENT: &str = "overlay-content";
    pub const OVERLAY_CLOSE: &str = "overlay-close";
    pub const SETTINGS_TITLE: &str = "settings-title";
    pub const SETTINGS_BUTTON: &str = "settings-button";
    pub const OBJECT_HEADER: &str = "obj-header";

    /// Wrapper pairing an input with its parameter sub-section
    pub const INPUT: &str = "input";
    pub const INPUT_PARAMS: &str = "input-params";

    pub const HIDDEN: &str = "hidden";

    /// Set on a table while one of its overlays is shown
    pub const NO_TRANSFORM: &str = "no-transform";
}

/// Attribute names
pub mod attrs {
    pub const ID: &str = "id";
    pub const NAME: &str = "name";
    pub const TYPE: &str = "type";
    pub const VALUE: &str = "value";
    pub const STYLE: &str = "style";
    pub const DATA_NAME: &str = "data-name";
    pub const DATA_ID: &str = "data-id";
    pub const DATA_FOR: &str = "data-for";
    pub const DATA_ACTIVE: &str = "data-active";
    pub const DATA_INPUT_TYPE: &str = "data-input-type";
    pub const DATA_X: &str = "data-x";
    pub const DATA_Y: &str = "data-y";
}

/// Reserved `data-name` values of the name inputs
pub mod names {
    pub const TABLE_NAME: &str = "table-name";
    pub const FIELD_NAME: &str = "field-name";

    /// Title fallback when an object has no name yet
    pub const UNDEFINED: &str = "[undefined]";
}

/// Schema error formatting
pub mod schema {
    /// Delimits breadcrumb frames in error messages
    pub const CONTEXT_DELIMITER: &str = " > ";

    /// Separates the breadcrumb from the error messages
    pub const ERROR_DELIMITER: &str = ": ";
}

/// Configuration file location
pub mod config {
    pub const APP_DIR: &str = "schema-sketch";
    pub const FILENAME: &str = "config.toml";
}

/// Bounds applied when validating configuration values
pub mod validation {
    pub const MIN_WINDOW_DIMENSION: u16 = 320;
    pub const MAX_WINDOW_DIMENSION: u16 = 7680;
}
