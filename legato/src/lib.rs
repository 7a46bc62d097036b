//! # Legato
//!
//! Legatoは、人手で記述されたCSV形式の語彙を、形態素解析器が
//! メモリマップ経由で直接ロードできるコンパクトなバイナリ辞書ブロックへ
//! コンパイルするライブラリです。
//!
//! ## 概要
//!
//! コンパイラは行を1つずつ解析・検証して単語エントリのリストへ蓄積し、
//! 全行の取り込み後に1回のシリアライズパスでエントリ間の参照
//! (分割、辞書形、同義語グループ)を解決してバイナリブロックを書き出します。
//! 参照の解決を遅延させることで、後続の行や別の名前空間
//! (システム辞書/ユーザー辞書)のエントリへの参照を1パスの字句処理で
//! 扱えます。
//!
//! ## 主な機能
//!
//! - **行の解析と検証**: 列数、フィールド長、分割の整合性の検査
//! - **参照解決**: 数値ID・内容記述子の両形式と2つのID名前空間をサポート
//! - **ストリーム書き出し**: 有界バッファによる辞書サイズ非依存のメモリ使用量
//! - **オフセットテーブル**: 可変長レコードへの定数時間ランダムアクセス
//!
//! ## 使用例
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::io::Cursor;
//!
//! use legato::{CsvLexicon, LexiconIndex, Pos, PosTable, WordInfo};
//!
//! let pos_table = PosTable::new([
//!     Pos::new(["名詞", "普通名詞", "一般", "*", "*", "*"].map(String::from)),
//! ])?;
//!
//! let mut lexicon = CsvLexicon::new(&pos_table);
//! lexicon.load("大学,1,1,100,大学,名詞,普通名詞,一般,*,*,*,ダイガク,大学,*,A,*,*,*".as_bytes())?;
//!
//! let index = LexiconIndex::from_entries(lexicon.entries());
//! let mut sink = Cursor::new(vec![]);
//! lexicon.write_to(&index, &mut sink)?;
//!
//! let block = sink.into_inner();
//! assert_eq!(u32::from_le_bytes(block[0..4].try_into()?), 1);
//!
//! // エントリ数(4) + パラメータセクション(6) の直後がオフセットテーブルです。
//! let offset = u32::from_le_bytes(block[10..14].try_into()?) as usize;
//! let (info, _) = WordInfo::read(&block[offset..])?;
//! assert_eq!(info.surface, "大学");
//! assert_eq!(info.reading_form, "ダイガク");
//! assert_eq!(info.normalized_form, "大学");
//! # Ok(())
//! # }
//! ```

#[cfg(not(any(target_pointer_width = "32", target_pointer_width = "64")))]
compile_error!("`target_pointer_width` must be 32 or 64");

/// 辞書データの型定義とコンパイルモジュール
pub mod dictionary;

/// エラー型の定義
pub mod errors;

/// 内部ユーティリティ関数
pub mod utils;

#[cfg(test)]
mod tests;

// Re-exports
pub use dictionary::build::lexicon::{CsvLexicon, WordEntry};
pub use dictionary::build::parameters::{Parameters, WordParam};
pub use dictionary::build::resolver::{LexiconIndex, WordIdResolver};
pub use dictionary::pos::{Pos, PosTable};
pub use dictionary::word_info::WordInfo;
pub use dictionary::LexType;

/// このライブラリのバージョン番号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
