// crates/mh_io/src/vtu/encoder.rs

//! DataArray 编码器 (ASCII / 内联 base64)
//!
//! 内联二进制格式（`format="binary"`）：
//! - 数据块 = Header (u32, 字节数) + Data (原始二进制)
//! - 整块做 base64 编码后直接写在 `<DataArray>` 标签内
//! - 字节序由 VTKFile 头部的 `byte_order` 声明，与本机一致

use std::borrow::Cow;
use std::io::{self, Write};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bytemuck::Pod;
use mh_config::VtkDataFormat;

/// 本机字节序在 VTKFile 头部中的写法
pub fn byte_order() -> &'static str {
    if cfg!(target_endian = "little") {
        "LittleEndian"
    } else {
        "BigEndian"
    }
}

/// 可写入 DataArray 的元素类型
pub trait VtkDataType: Pod {
    /// VTK 类型名
    const TYPE_NAME: &'static str;

    /// ASCII 表示
    fn fmt_ascii(&self) -> String;
}

impl VtkDataType for f64 {
    const TYPE_NAME: &'static str = "Float64";

    fn fmt_ascii(&self) -> String {
        // 科学计数法，避免 1e-9 量级的扩散系数被截断为 0
        format!("{:e}", self)
    }
}

impl VtkDataType for i32 {
    const TYPE_NAME: &'static str = "Int32";

    fn fmt_ascii(&self) -> String {
        self.to_string()
    }
}

impl VtkDataType for u8 {
    const TYPE_NAME: &'static str = "UInt8";

    fn fmt_ascii(&self) -> String {
        self.to_string()
    }
}

/// 每行最多写出的 ASCII 值个数
const VALUES_PER_LINE: usize = 6;

/// 转义 XML 属性值中的 `& < > " '`
///
/// 字段名由相名、组分名拼接而来，文件名由输出前缀拼接而来，两者都可能含有这些字符。
pub fn xml_escape(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// 数据块头部：u32 表示的字节数
///
/// 超过 `u32::MAX` 字节的数组无法用单块头部描述，返回 `InvalidInput`。
fn block_header(n_bytes: usize) -> io::Result<[u8; 4]> {
    let len = u32::try_from(n_bytes).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("DataArray 字节数 {n_bytes} 超出 u32 头部范围"),
        )
    })?;
    Ok(len.to_ne_bytes())
}

/// 编码 Header + Data 并做 base64
fn encode_base64<T: Pod>(data: &[T]) -> io::Result<String> {
    let bytes: &[u8] = bytemuck::cast_slice(data);
    let mut block = Vec::with_capacity(4 + bytes.len());
    block.extend_from_slice(&block_header(bytes.len())?);
    block.extend_from_slice(bytes);
    Ok(BASE64.encode(&block))
}

/// 写出一个完整的 `<DataArray>` 元素
pub fn write_data_array<W: Write, T: VtkDataType>(
    w: &mut W,
    indent: usize,
    name: Option<&str>,
    n_components: usize,
    data: &[T],
    format: VtkDataFormat,
) -> io::Result<()> {
    let pad = " ".repeat(indent);
    let format_attr = match format {
        VtkDataFormat::Ascii => "ascii",
        VtkDataFormat::Base64 => "binary",
    };

    write!(w, r#"{}<DataArray type="{}""#, pad, T::TYPE_NAME)?;
    if let Some(name) = name {
        write!(w, r#" Name="{}""#, xml_escape(name))?;
    }
    if n_components > 1 {
        write!(w, r#" NumberOfComponents="{}""#, n_components)?;
    }
    writeln!(w, r#" format="{}">"#, format_attr)?;

    match format {
        VtkDataFormat::Ascii => {
            for chunk in data.chunks(VALUES_PER_LINE) {
                let line: Vec<String> = chunk.iter().map(VtkDataType::fmt_ascii).collect();
                writeln!(w, "{}  {}", pad, line.join(" "))?;
            }
        }
        VtkDataFormat::Base64 => {
            writeln!(w, "{}  {}", pad, encode_base64(data)?)?;
        }
    }

    writeln!(w, "{}</DataArray>", pad)?;
    Ok(())
}
