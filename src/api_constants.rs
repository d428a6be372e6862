/// 翻译引擎配置常量
///
/// 该文件定义了翻译提供者、翻译记忆存储和XLIFF格式相关的常量配置，方便统一管理和维护

/// 默认翻译API配置
pub mod api_config {
    /// 默认翻译API地址（本地DeepLX兼容服务）
    pub const DEFAULT_API_URL: &str = "http://localhost:1188/translate";

    /// 默认翻译提供者标识
    pub const DEFAULT_PROVIDER_ID: &str = "deeplx";

    /// 请求超时时间（秒）
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;
}

/// 翻译服务配置
pub mod service_config {
    /// 默认源语言（词表原文语言）
    pub const DEFAULT_SOURCE_LANG: &str = "en";

    /// 默认目标语言
    pub const DEFAULT_TARGET_LANG: &str = "es";

    /// 默认并发处理的术语数量
    pub const DEFAULT_CONCURRENT_TERMS: usize = 5;
}

/// 翻译记忆存储配置
pub mod storage_config {
    /// 翻译记忆根目录名
    pub const TRANSLATIONS_DIR_NAME: &str = "vocabulary_translations";

    /// 随包分发的种子文件目录
    pub const DEFAULT_SEED_DIR: &str = "resources/seeds";

    /// 人工翻译资源目录
    pub const DEFAULT_RESOURCES_DIR: &str = "resources/human";

    /// 翻译文件扩展名
    pub const XLIFF_EXTENSION: &str = "xliff";
}

/// XLIFF格式常量
pub mod xliff_format {
    /// XLIFF版本
    pub const VERSION: &str = "1.2";

    /// XLIFF命名空间
    pub const XMLNS: &str = "urn:oasis:names:tc:xliff:document:1.2";

    /// 根元素
    pub const ROOT_TAG: &str = "xliff";

    /// 文件元素
    pub const FILE_TAG: &str = "file";

    /// 正文元素
    pub const BODY_TAG: &str = "body";

    /// 翻译单元元素
    pub const UNIT_TAG: &str = "trans-unit";

    /// 原文元素
    pub const SOURCE_TAG: &str = "source";

    /// 译文元素
    pub const TARGET_TAG: &str = "target";

    /// 翻译单元ID属性
    pub const ID_ATTR: &str = "id";
}

/// 术语字段名称
pub mod term_fields {
    /// 术语名称字段
    pub const NAME_FIELD: &str = "name";

    /// 术语定义字段
    pub const DEFINITION_FIELD: &str = "def";

    /// 人工翻译资源中的名称属性
    pub const LABEL_ATTR: &str = "label";

    /// 人工翻译资源中的定义属性
    pub const DEFINITION_ATTR: &str = "definition";

    /// 术语ID字段（JSON输入）
    pub const ID_FIELD: &str = "id";
}
