// crates/mh_config/src/params.rs

//! 运行时参数注册表
//!
//! 每个可配置项在使用前必须先注册：名称、默认值、人类可读的描述。
//! 注册表保证"缺失即默认"，上层模块查询时不会遇到未定义的值。
//!
//! # 使用示例
//!
//! ```rust
//! use mh_config::{ParameterRegistry, ParamSpec};
//!
//! let registry = ParameterRegistry::new();
//! registry.register(ParamSpec::bool(
//!     "VtkWriteTortuosities",
//!     false,
//!     "Include the tortuosity for each phase in the VTK output files",
//! )).unwrap();
//! registry.end_registration();
//!
//! registry.apply_overrides(["--VtkWriteTortuosities=true"]).unwrap();
//! assert!(registry.get_bool("VtkWriteTortuosities").unwrap());
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

// ============================================================
// 参数值
// ============================================================

/// 参数值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// 布尔开关
    Bool(bool),
    /// 整数
    Int(i64),
    /// 浮点数
    Float(f64),
    /// 字符串
    Str(String),
}

impl ParamValue {
    /// 类型名称
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
        }
    }

    /// 按 `self` 的类型解析字符串
    fn parse_like(&self, name: &str, raw: &str) -> ConfigResult<ParamValue> {
        let raw = raw.trim();
        let invalid = |reason: &str| ConfigError::InvalidValue {
            key: name.to_string(),
            value: raw.to_string(),
            reason: reason.to_string(),
        };
        match self {
            Self::Bool(_) => match raw.to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(Self::Bool(true)),
                "false" | "0" | "no" | "off" => Ok(Self::Bool(false)),
                _ => Err(invalid("期望布尔值 (true/false)")),
            },
            Self::Int(_) => raw
                .parse::<i64>()
                .map(Self::Int)
                .map_err(|_| invalid("期望整数")),
            Self::Float(_) => raw
                .parse::<f64>()
                .map(Self::Float)
                .map_err(|_| invalid("期望浮点数")),
            Self::Str(_) => Ok(Self::Str(raw.to_string())),
        }
    }

    /// 按 `self` 的类型接受新值；整数可以提升为浮点数
    fn coerce_like(&self, name: &str, value: ParamValue) -> ConfigResult<ParamValue> {
        match (self, value) {
            (Self::Bool(_), v @ Self::Bool(_)) => Ok(v),
            (Self::Int(_), v @ Self::Int(_)) => Ok(v),
            (Self::Float(_), v @ Self::Float(_)) => Ok(v),
            (Self::Float(_), Self::Int(i)) => Ok(Self::Float(i as f64)),
            (Self::Str(_), v @ Self::Str(_)) => Ok(v),
            (expected, actual) => Err(ConfigError::TypeMismatch {
                name: name.to_string(),
                expected: expected.kind(),
                actual: actual.kind(),
            }),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Str(v) => write!(f, "{}", v),
        }
    }
}

// ============================================================
// 参数声明
// ============================================================

/// 参数声明：名称、默认值、描述
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    /// 参数名（同时是命令行和参数文件中的键）
    pub name: &'static str,
    /// 默认值，同时决定参数类型
    pub default: ParamValue,
    /// 描述
    pub description: &'static str,
}

impl ParamSpec {
    /// 布尔参数
    pub fn bool(name: &'static str, default: bool, description: &'static str) -> Self {
        Self {
            name,
            default: ParamValue::Bool(default),
            description,
        }
    }

    /// 整数参数
    pub fn int(name: &'static str, default: i64, description: &'static str) -> Self {
        Self {
            name,
            default: ParamValue::Int(default),
            description,
        }
    }

    /// 浮点参数
    pub fn float(name: &'static str, default: f64, description: &'static str) -> Self {
        Self {
            name,
            default: ParamValue::Float(default),
            description,
        }
    }

    /// 字符串参数
    pub fn string(name: &'static str, default: &str, description: &'static str) -> Self {
        Self {
            name,
            default: ParamValue::Str(default.to_string()),
            description,
        }
    }
}

// ============================================================
// 查询接口
// ============================================================

/// 参数查询接口
///
/// 诊断模块只通过此接口读取开关，便于在测试中替换为简单的映射。
/// 返回 `None` 表示参数未注册，调用方应回退到自己的声明默认值。
pub trait ParamSource: Send + Sync {
    /// 查询布尔参数的当前值
    fn lookup_bool(&self, name: &str) -> Option<bool>;
}

impl ParamSource for HashMap<String, bool> {
    fn lookup_bool(&self, name: &str) -> Option<bool> {
        self.get(name).copied()
    }
}

// ============================================================
// 注册表
// ============================================================

#[derive(Debug, Default)]
struct RegistryInner {
    specs: BTreeMap<&'static str, ParamSpec>,
    values: HashMap<&'static str, ParamValue>,
    closed: bool,
}

impl RegistryInner {
    fn spec(&self, name: &str) -> ConfigResult<&ParamSpec> {
        self.specs
            .get(name)
            .ok_or_else(|| ConfigError::UnknownParameter(name.to_string()))
    }
}

/// 参数注册表
///
/// 内部使用读写锁，可通过 `Arc` 在线程间共享。
#[derive(Debug, Default)]
pub struct ParameterRegistry {
    inner: RwLock<RegistryInner>,
}

impl ParameterRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册参数
    ///
    /// 同一参数以相同默认值重复注册是允许的（多个模块共享同一开关）；
    /// 默认值或类型不一致时报错。注册阶段结束后不能再注册。
    pub fn register(&self, spec: ParamSpec) -> ConfigResult<()> {
        let mut inner = self.inner.write();
        if inner.closed {
            return Err(ConfigError::RegistrationClosed(spec.name.to_string()));
        }
        if let Some(existing) = inner.specs.get(spec.name) {
            if existing.default != spec.default {
                return Err(ConfigError::DuplicateParameter(spec.name.to_string()));
            }
            return Ok(());
        }
        log::trace!("注册参数 {} = {}", spec.name, spec.default);
        inner.specs.insert(spec.name, spec);
        Ok(())
    }

    /// 结束注册阶段
    pub fn end_registration(&self) {
        let mut inner = self.inner.write();
        inner.closed = true;
        log::debug!("参数注册结束，共 {} 个参数", inner.specs.len());
    }

    /// 注册阶段是否已结束
    pub fn is_closed(&self) -> bool {
        self.inner.read().closed
    }

    /// 参数是否已注册
    pub fn is_registered(&self, name: &str) -> bool {
        self.inner.read().specs.contains_key(name)
    }

    /// 所有参数声明（按名称排序）
    pub fn specs(&self) -> Vec<ParamSpec> {
        self.inner.read().specs.values().cloned().collect()
    }

    /// 设置参数值
    pub fn set(&self, name: &str, value: ParamValue) -> ConfigResult<()> {
        let mut inner = self.inner.write();
        let spec = inner.spec(name)?;
        let key = spec.name;
        let value = spec.default.coerce_like(name, value)?;
        inner.values.insert(key, value);
        Ok(())
    }

    /// 按注册类型解析字符串并设置
    pub fn set_from_str(&self, name: &str, raw: &str) -> ConfigResult<()> {
        let mut inner = self.inner.write();
        let spec = inner.spec(name)?;
        let key = spec.name;
        let value = spec.default.parse_like(name, raw)?;
        inner.values.insert(key, value);
        Ok(())
    }

    /// 应用命令行风格的覆盖项：`Name=value` 或 `--Name=value`
    pub fn apply_overrides<I, S>(&self, args: I) -> ConfigResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            let arg = arg.as_ref();
            let body = arg.trim_start_matches("--");
            let (name, raw) = body.split_once('=').ok_or_else(|| {
                ConfigError::Parse(format!("覆盖项 '{arg}' 缺少 '=', 期望 Name=value"))
            })?;
            self.set_from_str(name.trim(), raw)?;
        }
        Ok(())
    }

    /// 从 JSON 字符串加载参数值（扁平对象 `{"Name": value}`）
    pub fn load_json_str(&self, content: &str) -> ConfigResult<()> {
        let values: BTreeMap<String, ParamValue> =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        for (name, value) in values {
            // JSON 中的字符串也允许写布尔/数值
            match value {
                ParamValue::Str(raw) => self.set_from_str(&name, &raw)?,
                other => self.set(&name, other)?,
            }
        }
        Ok(())
    }

    /// 从 JSON 文件加载参数值
    pub fn load_json_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content = std::fs::read_to_string(path.as_ref())?;
        self.load_json_str(&content)?;
        log::info!("已加载参数文件 {}", path.as_ref().display());
        Ok(())
    }

    /// 当前值（未设置时为默认值）
    pub fn get(&self, name: &str) -> ConfigResult<ParamValue> {
        let inner = self.inner.read();
        let spec = inner.spec(name)?;
        Ok(inner
            .values
            .get(name)
            .cloned()
            .unwrap_or_else(|| spec.default.clone()))
    }

    /// 布尔参数
    pub fn get_bool(&self, name: &str) -> ConfigResult<bool> {
        match self.get(name)? {
            ParamValue::Bool(v) => Ok(v),
            other => Err(mismatch(name, "bool", &other)),
        }
    }

    /// 整数参数
    pub fn get_int(&self, name: &str) -> ConfigResult<i64> {
        match self.get(name)? {
            ParamValue::Int(v) => Ok(v),
            other => Err(mismatch(name, "int", &other)),
        }
    }

    /// 浮点参数
    pub fn get_float(&self, name: &str) -> ConfigResult<f64> {
        match self.get(name)? {
            ParamValue::Float(v) => Ok(v),
            ParamValue::Int(v) => Ok(v as f64),
            other => Err(mismatch(name, "float", &other)),
        }
    }

    /// 字符串参数
    pub fn get_string(&self, name: &str) -> ConfigResult<String> {
        match self.get(name)? {
            ParamValue::Str(v) => Ok(v),
            other => Err(mismatch(name, "string", &other)),
        }
    }

    /// 导出当前全部参数值为 JSON（可直接作为参数文件使用）
    pub fn to_json(&self) -> ConfigResult<String> {
        let inner = self.inner.read();
        let snapshot: BTreeMap<&str, &ParamValue> = inner
            .specs
            .values()
            .map(|spec| {
                let value = inner.values.get(spec.name).unwrap_or(&spec.default);
                (spec.name, value)
            })
            .collect();
        serde_json::to_string_pretty(&snapshot).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

fn mismatch(name: &str, expected: &'static str, actual: &ParamValue) -> ConfigError {
    ConfigError::TypeMismatch {
        name: name.to_string(),
        expected,
        actual: actual.kind(),
    }
}

impl ParamSource for ParameterRegistry {
    fn lookup_bool(&self, name: &str) -> Option<bool> {
        self.get_bool(name).ok()
    }
}
