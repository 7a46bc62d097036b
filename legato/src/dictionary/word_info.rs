//! 単語情報レコード
//!
//! このモジュールは、辞書ブロックに格納される1単語分の情報と、
//! シリアライズ済みレコードのデコード機能を提供します。

use crate::errors::{LegatoError, Result};

/// 1単語分の辞書情報
///
/// 表層形、品詞ID、正規化形、辞書形、読み、分割情報、
/// 同義語グループIDを保持します。
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct WordInfo {
    /// 表層形
    pub surface: String,

    /// 索引見出し語のUTF-8バイト長
    pub head_word_length: u16,

    /// 品詞ID
    pub pos_id: i16,

    /// 正規化形
    pub normalized_form: String,

    /// 辞書形の単語ID(-1は自身を表します)
    pub dictionary_form_word_id: i32,

    /// 読み
    pub reading_form: String,

    /// A単位分割の単語ID列
    pub a_unit_split: Vec<i32>,

    /// B単位分割の単語ID列
    pub b_unit_split: Vec<i32>,

    /// 語構成の単語ID列
    pub word_structure: Vec<i32>,

    /// 同義語グループID列
    pub synonym_group_ids: Vec<i32>,
}

impl WordInfo {
    /// シリアライズ済みレコードを先頭からデコードします。
    ///
    /// 正規化形と読みの空文字列は「表層形と同一」を意味する
    /// 圧縮表現であり、デコード時に表層形へ展開されます。
    ///
    /// # 引数
    ///
    /// * `bytes` - レコードの先頭から始まるバイト列
    ///
    /// # 戻り値
    ///
    /// デコードされた`WordInfo`と消費したバイト数の組。
    ///
    /// # エラー
    ///
    /// バイト列が途中で尽きた場合、または文字列フィールドが
    /// 正しいUTF-8でない場合にエラーを返します。
    pub fn read(bytes: &[u8]) -> Result<(Self, usize)> {
        let mut pos = 0;

        let surface = read_str(bytes, &mut pos)?;
        let head_word_length = u16::from_le_bytes(read_array(bytes, &mut pos)?);
        let pos_id = i16::from_le_bytes(read_array(bytes, &mut pos)?);
        let normalized_form = read_str_or(bytes, &mut pos, &surface)?;
        let dictionary_form_word_id = i32::from_le_bytes(read_array(bytes, &mut pos)?);
        let reading_form = read_str_or(bytes, &mut pos, &surface)?;
        let a_unit_split = read_i32s(bytes, &mut pos)?;
        let b_unit_split = read_i32s(bytes, &mut pos)?;
        let word_structure = read_i32s(bytes, &mut pos)?;
        let synonym_group_ids = read_i32s(bytes, &mut pos)?;

        Ok((
            Self {
                surface,
                head_word_length,
                pos_id,
                normalized_form,
                dictionary_form_word_id,
                reading_form,
                a_unit_split,
                b_unit_split,
                word_structure,
                synonym_group_ids,
            },
            pos,
        ))
    }
}

fn read_slice<'a>(bytes: &'a [u8], pos: &mut usize, len: usize) -> Result<&'a [u8]> {
    let end = pos
        .checked_add(len)
        .filter(|&end| end <= bytes.len())
        .ok_or_else(|| LegatoError::structural("truncated word entry"))?;
    let slice = &bytes[*pos..end];
    *pos = end;
    Ok(slice)
}

fn read_array<const N: usize>(bytes: &[u8], pos: &mut usize) -> Result<[u8; N]> {
    // The length is checked in read_slice, so the conversion never fails.
    Ok(read_slice(bytes, pos, N)?.try_into().unwrap())
}

fn read_str(bytes: &[u8], pos: &mut usize) -> Result<String> {
    let len = usize::from(u16::from_le_bytes(read_array(bytes, pos)?));
    Ok(std::str::from_utf8(read_slice(bytes, pos, len)?)?.to_string())
}

fn read_str_or(bytes: &[u8], pos: &mut usize, surface: &str) -> Result<String> {
    let text = read_str(bytes, pos)?;
    if text.is_empty() {
        Ok(surface.to_string())
    } else {
        Ok(text)
    }
}

fn read_i32s(bytes: &[u8], pos: &mut usize) -> Result<Vec<i32>> {
    let len = usize::from(read_array::<1>(bytes, pos)?[0]);
    let mut values = Vec::with_capacity(len);
    for _ in 0..len {
        values.push(i32::from_le_bytes(read_array(bytes, pos)?));
    }
    Ok(values)
}
