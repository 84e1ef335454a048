//! # PDF 元数据编解码器
//!
//! 把脚本内容作为十六进制字符串写入 PDF 页面字典中的 `ScriptData` 键，并在提取时读回。
//! 没有位运算，也没有容量计算。
//!
//! 默认每一页都保存一份完整副本 (与早期版本生成的文件兼容，但很浪费)。
//! [`Placement::Document`] 只在文档 Info 字典中保存一份。

use crate::constants::PDF_METADATA_KEY;
use crate::error::{Result, StegoError, ensure_exists, read_payload, write_payload};
use clap::ValueEnum;
use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat};
use std::path::Path;

/// 脚本在 PDF 中的存放位置。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Placement {
    /// 每个页面字典各存一份。
    #[default]
    Pages,

    /// 只在文档 Info 字典中存一份。
    Document,
}

fn open_document(path: &Path) -> Result<Document> {
    Document::load(path).map_err(|e| StegoError::OpenFailure {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn dictionary_mut<'a>(doc: &'a mut Document, id: ObjectId, path: &Path) -> Result<&'a mut Dictionary> {
    doc.get_object_mut(id)
        .and_then(|object| object.as_dict_mut())
        .map_err(|e| StegoError::OpenFailure {
            path: path.to_path_buf(),
            reason: format!("object {} {} is not a dictionary: {e}", id.0, id.1),
        })
}

fn info_dictionary(doc: &Document) -> Option<&Dictionary> {
    match doc.trailer.get(b"Info").ok()? {
        Object::Reference(id) => doc.get_dictionary(*id).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

fn non_empty_value(dict: &Dictionary) -> Option<Vec<u8>> {
    dict.get(PDF_METADATA_KEY)
        .and_then(|value| value.as_str())
        .ok()
        .filter(|value| !value.is_empty())
        .map(<[u8]>::to_vec)
}

/// 返回文档 Info 字典的可变引用，不存在时新建一个间接对象。
/// Info 直接内嵌在 trailer 中时就地修改，保留原有的 Title/Author 等条目。
fn info_dictionary_mut<'a>(doc: &'a mut Document, path: &Path) -> Result<&'a mut Dictionary> {
    if matches!(doc.trailer.get(b"Info"), Ok(Object::Dictionary(_))) {
        return doc
            .trailer
            .get_mut(b"Info")
            .and_then(|info| info.as_dict_mut())
            .map_err(|e| StegoError::OpenFailure {
                path: path.to_path_buf(),
                reason: format!("trailer Info is not a dictionary: {e}"),
            });
    }

    let existing = doc
        .trailer
        .get(b"Info")
        .and_then(|info| info.as_reference())
        .ok();
    let info_id = existing.unwrap_or_else(|| {
        let id = doc.add_object(Dictionary::new());
        doc.trailer.set("Info", id);
        id
    });
    dictionary_mut(doc, info_id, path)
}

/// 把 `payload` 写入内存中的文档，返回写入的字典数量。
///
/// 没有页面的文档在 [`Placement::Pages`] 下返回 0。
/// [`Placement::Document`] 会先清除页面上已有的副本，否则提取时旧页面值会优先。
/// `path` 只用于错误信息。
pub fn write_script(doc: &mut Document, payload: &[u8], placement: Placement, path: &Path) -> Result<usize> {
    let value = Object::String(payload.to_vec(), StringFormat::Hexadecimal);

    match placement {
        Placement::Pages => {
            let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
            for &id in &page_ids {
                dictionary_mut(doc, id, path)?.set(PDF_METADATA_KEY, value.clone());
            }
            Ok(page_ids.len())
        }
        Placement::Document => {
            for id in doc.get_pages().into_values() {
                dictionary_mut(doc, id, path)?.remove(PDF_METADATA_KEY);
            }
            info_dictionary_mut(doc, path)?.set(PDF_METADATA_KEY, value);
            Ok(1)
        }
    }
}

/// 按页面顺序查找第一个非空的 `ScriptData`，后续页面不再检查。
/// 所有页面都没有时，再检查文档 Info 字典。
pub fn read_script(doc: &Document) -> Option<Vec<u8>> {
    doc.get_pages()
        .into_values()
        .filter_map(|id| doc.get_dictionary(id).ok())
        .find_map(non_empty_value)
        .or_else(|| info_dictionary(doc).and_then(non_empty_value))
}

/// 把 `script` 嵌入 `input` PDF，结果保存到 `output`，返回写入的字典数量。
///
/// # Errors
///
/// * [`StegoError::NotFound`] - 输入 PDF 或脚本文件不存在。
/// * [`StegoError::OpenFailure`] - PDF 无法解析。
/// * [`StegoError::ReadFailure`] - 脚本文件无法读取。
/// * [`StegoError::WriteFailure`] - 无法保存输出 PDF。
pub fn embed_pdf(input: &Path, output: &Path, script: &Path, placement: Placement) -> Result<usize> {
    ensure_exists(input)?;
    ensure_exists(script)?;

    let mut doc = open_document(input)?;
    let payload = read_payload(script)?;
    let written = write_script(&mut doc, &payload, placement, input)?;

    doc.save(output).map_err(|e| StegoError::WriteFailure {
        path: output.to_path_buf(),
        reason: e.to_string(),
    })?;

    Ok(written)
}

/// 从 `input` PDF 中提取脚本并写入 `output`，返回提取的字节数。
///
/// # Errors
///
/// * [`StegoError::NotFound`] - PDF 文件不存在。
/// * [`StegoError::OpenFailure`] - PDF 无法解析。
/// * [`StegoError::DataAbsent`] - 没有找到非空的脚本数据。
/// * [`StegoError::WriteFailure`] - 无法写入输出脚本。
pub fn extract_pdf(input: &Path, output: &Path) -> Result<usize> {
    ensure_exists(input)?;

    let doc = open_document(input)?;
    let payload = read_script(&doc).ok_or_else(|| StegoError::DataAbsent {
        path: input.to_path_buf(),
    })?;

    write_payload(output, &payload)?;
    Ok(payload.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{Stream, dictionary};

    fn document_with_pages(count: usize) -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let kids: Vec<Object> = (0..count)
            .map(|_| {
                let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "Contents" => content_id,
                })
                .into()
            })
            .collect();

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => Object::Integer(count as i64),
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    fn page_value(doc: &Document, page_number: u32) -> Option<Vec<u8>> {
        let id = doc.get_pages()[&page_number];
        doc.get_dictionary(id).ok().and_then(non_empty_value)
    }

    #[test]
    fn every_page_gets_a_copy() {
        let mut doc = document_with_pages(3);
        let written = write_script(&mut doc, b"hello", Placement::Pages, Path::new("mem.pdf")).unwrap();

        assert_eq!(written, 3);
        for page in 1..=3 {
            assert_eq!(page_value(&doc, page).as_deref(), Some(&b"hello"[..]));
        }
        assert_eq!(read_script(&doc).as_deref(), Some(&b"hello"[..]));
    }

    #[test]
    fn first_non_empty_page_wins() {
        let mut doc = document_with_pages(3);
        let pages = doc.get_pages();
        for (number, value) in [(1u32, &b""[..]), (2, &b"second"[..]), (3, &b"third"[..])] {
            doc.get_object_mut(pages[&number])
                .and_then(|object| object.as_dict_mut())
                .unwrap()
                .set(PDF_METADATA_KEY, Object::string_literal(value));
        }

        assert_eq!(read_script(&doc).as_deref(), Some(&b"second"[..]));
    }

    #[test]
    fn document_placement_uses_info_dictionary() {
        let mut doc = document_with_pages(2);
        let written =
            write_script(&mut doc, b"#!/bin/sh", Placement::Document, Path::new("mem.pdf")).unwrap();

        assert_eq!(written, 1);
        assert_eq!(page_value(&doc, 1), None);
        assert_eq!(read_script(&doc).as_deref(), Some(&b"#!/bin/sh"[..]));
    }

    #[test]
    fn document_placement_replaces_page_copies() {
        let mut doc = document_with_pages(2);
        write_script(&mut doc, b"old", Placement::Pages, Path::new("mem.pdf")).unwrap();
        write_script(&mut doc, b"new", Placement::Document, Path::new("mem.pdf")).unwrap();

        assert_eq!(page_value(&doc, 1), None);
        assert_eq!(page_value(&doc, 2), None);
        assert_eq!(read_script(&doc).as_deref(), Some(&b"new"[..]));
    }

    #[test]
    fn inline_info_dictionary_keeps_existing_entries() {
        let mut doc = document_with_pages(1);
        doc.trailer.set(
            "Info",
            dictionary! {
                "Title" => Object::string_literal("Quarterly report"),
            },
        );

        write_script(&mut doc, b"echo ok", Placement::Document, Path::new("mem.pdf")).unwrap();

        let info = info_dictionary(&doc).unwrap();
        assert_eq!(
            info.get(b"Title").and_then(|title| title.as_str()).unwrap(),
            b"Quarterly report"
        );
        assert_eq!(read_script(&doc).as_deref(), Some(&b"echo ok"[..]));
    }

    #[test]
    fn empty_document_has_no_script() {
        let doc = document_with_pages(2);
        assert_eq!(read_script(&doc), None);
    }
}
