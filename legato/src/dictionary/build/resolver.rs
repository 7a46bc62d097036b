//! 単語IDの逆引きと検証
//!
//! このモジュールは、内容記述子`(表層形, 品詞ID, 読み)`から単語IDへの
//! 逆引きと、`(名前空間, ID)`の組の範囲検証を提供します。
//! 名前空間の検証を1か所に集約することで、システム辞書とユーザー辞書の
//! IDが衝突しないことを保証します。

use hashbrown::HashMap;

use crate::dictionary::build::lexicon::WordEntry;
use crate::dictionary::word_id;
use crate::dictionary::LexType;
use crate::errors::{LegatoError, Result};

/// 単語参照の解決に必要な問い合わせ機能を提供するトレイト
///
/// コンパイル中、実装は読み取り専用の問い合わせサービスとして扱われます。
pub trait WordIdResolver {
    /// 内容記述子に一致する単語の複合IDを返します。
    ///
    /// # 戻り値
    ///
    /// 一致する単語が存在する場合は`Some(複合ID)`、存在しない場合は`None`。
    fn lookup(&self, headword: &str, pos_id: i16, reading: &str) -> Option<i32>;

    /// このリゾルバが対象とする辞書の種類を返します。
    fn lex_type(&self) -> LexType;

    /// 複合IDが既知のID範囲に収まっているかを検証します。
    ///
    /// # エラー
    ///
    /// IDが負の場合、または名前空間の範囲外の場合にエラーを返します。
    fn validate(&self, word_id: i32) -> Result<()>;
}

/// 取り込み済みエントリリストから構築される逆引き索引
///
/// `(表層形, 品詞ID, 読み)`が重複する場合、最初に出現した
/// エントリのIDが使用されます。
pub struct LexiconIndex {
    index: HashMap<(String, i16, String), u32>,
    num_entries: u32,
    lex_type: LexType,
    system_word_count: u32,
}

impl LexiconIndex {
    /// システム辞書ビルド用の索引を構築します。
    ///
    /// 数値参照はこの辞書自身のエントリ数に対して検証され、
    /// ユーザー名前空間のIDは拒否されます。
    pub fn from_entries(entries: &[WordEntry]) -> Self {
        Self {
            index: Self::build_index(entries),
            num_entries: entries.len() as u32,
            lex_type: LexType::System,
            system_word_count: 0,
        }
    }

    /// ユーザー辞書ビルド用の索引を構築します。
    ///
    /// 内容参照はユーザーエントリに対して解決され、複合IDには
    /// ユーザー名前空間のタグが付きます。システム名前空間の数値参照は
    /// `system_word_count`に対して検証されます。
    ///
    /// # 引数
    ///
    /// * `entries` - ユーザー辞書の取り込み済みエントリ
    /// * `system_word_count` - ベースとなるシステム辞書の単語数
    pub fn with_system(entries: &[WordEntry], system_word_count: u32) -> Self {
        Self {
            index: Self::build_index(entries),
            num_entries: entries.len() as u32,
            lex_type: LexType::User,
            system_word_count,
        }
    }

    fn build_index(entries: &[WordEntry]) -> HashMap<(String, i16, String), u32> {
        let mut index = HashMap::new();
        for (word_id, entry) in entries.iter().enumerate() {
            let info = &entry.word_info;
            index
                .entry((
                    info.surface.clone(),
                    info.pos_id,
                    info.reading_form.clone(),
                ))
                .or_insert(word_id as u32);
        }
        index
    }
}

impl WordIdResolver for LexiconIndex {
    fn lookup(&self, headword: &str, pos_id: i16, reading: &str) -> Option<i32> {
        let word_id = *self
            .index
            .get(&(headword.to_string(), pos_id, reading.to_string()))?;
        Some(word_id::make(self.lex_type.dic_id(), word_id))
    }

    fn lex_type(&self) -> LexType {
        self.lex_type
    }

    fn validate(&self, word_id: i32) -> Result<()> {
        if word_id < 0 {
            return Err(LegatoError::reference(format!(
                "word ID is negative: {word_id}",
            )));
        }
        let dic = word_id::dic(word_id);
        let word = word_id::word(word_id);
        let bound = match (self.lex_type, dic) {
            (LexType::System, 0) => self.num_entries,
            (LexType::User, 0) => self.system_word_count,
            (LexType::User, 1) => self.num_entries,
            _ => {
                return Err(LegatoError::reference(format!(
                    "invalid dictionary ID: {dic}",
                )));
            }
        };
        if word >= bound {
            return Err(LegatoError::reference(format!(
                "word ID is out of range: {word_id}",
            )));
        }
        Ok(())
    }
}
