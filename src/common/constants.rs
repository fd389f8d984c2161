/// Compiled-in defaults for a sync run.
/// Every value here can be overridden through `SyncConfig`.
// Source repository on GitHub
pub const DEFAULT_REPO_OWNER: &str = "ayoubbadou18-jpg";
pub const DEFAULT_REPO_NAME: &str = "laser-designs";
pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_FILES_PATH: &str = "assets/files";
pub const DEFAULT_IMAGES_PATH: &str = "assets/images";
pub const GITHUB_API_BASE: &str = "https://api.github.com";
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

// Catalog documents
pub const DEFAULT_INPUT_PATH: &str = "laser-files.json";
pub const DEFAULT_OUTPUT_PATH: &str = "laser-files.generated.json";
pub const DEFAULT_TARGET_CATEGORY_ID: &str = "curtains";

// Category created when the target category does not exist yet
pub const NEW_CATEGORY_ID: &str = "repo_designs";
pub const NEW_CATEGORY_NAME: &str = "📁 مكتبة التصاميم (GitHub)";
pub const NEW_CATEGORY_TYPE: &str = "designs";
pub const NEW_CATEGORY_ORDER: i64 = 12;
pub const NEW_CATEGORY_DESCRIPTION: &str = "تصاميم تمت إضافتها تلقائياً من مستودع GitHub.";

// Generated entries
pub const ID_PREFIX: &str = "gh";
pub const MAX_ID_LEN: usize = 60;
pub const SOURCE_TAG: &str = "GitHub";
pub const PLACEHOLDER_IMAGE_URL: &str = "https://i.imgur.com/8Q2Q2Qp.png";
pub const DEFAULT_DESCRIPTION: &str = "ملف جاهز للقص/الحفر بالليزر.";
pub const DEFAULT_USAGE_TYPE: &str = "cut";

pub const SUPPORTED_FILE_EXTENSIONS: [&str; 5] = ["dxf", "svg", "pdf", "ai", "cdr"];
pub const SUPPORTED_IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];
