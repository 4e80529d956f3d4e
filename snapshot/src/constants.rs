// ============================================================================
// DEPTH LEVEL CONSTANTS
// ============================================================================

/// Recursion budget for `DepthLevel::Basic`
pub const BASIC_MAX_DEPTH: usize = 2;

/// Recursion budget for `DepthLevel::Standard`
pub const STANDARD_MAX_DEPTH: usize = 4;

/// Recursion budget for `DepthLevel::Deep`
pub const DEEP_MAX_DEPTH: usize = 8;

/// Recursion budget for `DepthLevel::Full`
pub const FULL_MAX_DEPTH: usize = 32;

/// Expanded collection element cap for `DepthLevel::Standard`
pub const STANDARD_ELEMENT_CAP: usize = 100;

/// Expanded collection element cap for `DepthLevel::Deep`
pub const DEEP_ELEMENT_CAP: usize = 1000;

// ============================================================================
// MARKER WIRE FORMAT
// ============================================================================

/// Reserved discriminator key on marker objects
pub const MARKER_KEY: &str = "__marker";

/// Discriminator value for a back-reference to an ancestor
pub const MARKER_CYCLE: &str = "cycle";

/// Discriminator value for a node cut off by the depth budget
pub const MARKER_TRUNCATED: &str = "truncated";

/// Discriminator value for a contained fault
pub const MARKER_ERROR: &str = "error";

/// Discriminator value for a float JSON cannot represent
pub const MARKER_NON_FINITE: &str = "non_finite";

/// Marker field carrying the type name
pub const MARKER_FIELD_TYPE: &str = "type";

/// Marker field carrying the path of the referenced ancestor
pub const MARKER_FIELD_REF: &str = "ref";

/// Marker field carrying an error message
pub const MARKER_FIELD_MESSAGE: &str = "message";

/// Marker field carrying the textual float value
pub const MARKER_FIELD_VALUE: &str = "value";

// ============================================================================
// SUMMARY FIELDS
// ============================================================================

/// Field carrying the type name of an opaque or summarized object
pub const SUMMARY_FIELD_TYPE: &str = "type";

/// Field carrying the element count of a summarized collection
pub const SUMMARY_FIELD_COUNT: &str = "count";

// ============================================================================
// OBJECT PATH CONSTANTS
// ============================================================================

/// Path of the root object in diagnostics and cycle references
pub const ROOT_PATH: &str = "$";

// ============================================================================
// TYPE NAME CONSTANTS
// ============================================================================

// Capabilities
pub const TYPE_COLLECTION: &str = "Collection";
pub const TYPE_VALUE_TYPE: &str = "ValueType";

// Collections
pub const TYPE_LIST: &str = "List";
pub const TYPE_MAP: &str = "Map";

// Value types
pub const TYPE_VECTOR2: &str = "Vector2";
pub const TYPE_VECTOR3: &str = "Vector3";
pub const TYPE_VECTOR4: &str = "Vector4";
pub const TYPE_QUATERNION: &str = "Quaternion";
pub const TYPE_COLOR: &str = "Color";
pub const TYPE_RECT: &str = "Rect";
pub const TYPE_NAME: &str = "Name";

// ============================================================================
// OPERATION NAME CONSTANTS
// ============================================================================

/// Scene mutation command; needs deep fidelity
pub const OP_MANAGE_SCENE: &str = "manage_scene";

/// Scene object command
pub const OP_MANAGE_GAMEOBJECT: &str = "manage_gameobject";

/// Asset listing command; shallow is enough
pub const OP_MANAGE_ASSET: &str = "manage_asset";

/// Component inspection command
pub const OP_MANAGE_COMPONENT: &str = "manage_component";
