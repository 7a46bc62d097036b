//! CSV語彙のコンパイラ
//!
//! このモジュールは、CSV形式の語彙ソースを1行ずつ単語エントリへ解析・検証し、
//! 全行の取り込み後に分割参照を解決してバイナリブロックへ書き出す
//! コンパイラを提供します。
//!
//! 分割参照は後続の行や他の名前空間のエントリを指すことがあるため、
//! 解析時には参照の生テキストをエントリに保持し、解決はシリアライズ時まで
//! 遅延されます。

use std::io::{Read, Seek, SeekFrom, Write};
use std::sync::LazyLock;

use regex::Regex;

use crate::dictionary::build::chunk_buffer::ChunkBuffer;
use crate::dictionary::build::parameters::Parameters;
use crate::dictionary::build::resolver::WordIdResolver;
use crate::dictionary::build::unescape::unescape;
use crate::dictionary::pos::{Pos, PosTable};
use crate::dictionary::word_id;
use crate::dictionary::word_info::WordInfo;
use crate::dictionary::LexType;
use crate::errors::{LegatoError, Result};
use crate::utils;

/// 参照配列の最大要素数。
///
/// シリアライズ時の要素数は符号付き1バイトに収まる必要があります。
pub const ARRAY_MAX_LENGTH: usize = i8::MAX as usize;

/// 1行に必要な最小列数
pub const MIN_REQUIRED_NUMBER_OF_COLUMNS: usize = 18;

/// 文字列フィールドのUTF-8エンコード後の最大バイト長
pub const MAX_STRING_BYTES: usize = i16::MAX as usize;

// エスケープ解決の対象は行頭側の構造フィールドのみで、
// 末尾の参照フィールドは対象外です。
const NUM_ESCAPED_COLUMNS: usize = 15;

const BUFFER_CAPACITY: usize = 128 * 1024;
const LOW_WATER: usize = 16 * 1024;

static PATTERN_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^U?[0-9]+$").unwrap());

/// 1行から解析された単語エントリ
///
/// 3つの分割参照は解決前の生テキストのまま保持されます。
pub struct WordEntry {
    /// トライ索引用の見出し語。索引されないエントリでは`None`。
    pub headword: Option<String>,

    /// 格納される単語情報。分割配列は解決前のため空です。
    pub word_info: WordInfo,

    /// A単位分割の生テキスト
    pub a_unit_split_string: String,

    /// B単位分割の生テキスト
    pub b_unit_split_string: String,

    /// 語構成の生テキスト
    pub word_structure_string: String,
}

/// CSV語彙のコンパイラ
///
/// 行の解析・検証、参照の解決、バイナリブロックの書き出しを行います。
/// エントリは追加専用のリストに蓄積され、リスト内の位置が
/// このコンパイル単位内での単語IDになります。
pub struct CsvLexicon<'a> {
    pos_table: &'a PosTable,
    parameters: Parameters,
    entries: Vec<WordEntry>,
}

impl<'a> CsvLexicon<'a> {
    /// 品詞テーブルを参照する新しいコンパイラを作成します。
    pub fn new(pos_table: &'a PosTable) -> Self {
        Self {
            pos_table,
            parameters: Parameters::new(),
            entries: vec![],
        }
    }

    /// 取り込み済みのエントリリストを返します。
    #[inline(always)]
    pub fn entries(&self) -> &[WordEntry] {
        &self.entries
    }

    /// エントリを末尾に追加し、その単語IDを返します。
    pub fn add_entry(&mut self, entry: WordEntry) -> u32 {
        let word_id = self.entries.len() as u32;
        self.entries.push(entry);
        word_id
    }

    /// 接続IDの上限値をパラメータライターへ設定します。
    pub fn set_limits(&mut self, max_left: i16, max_right: i16) {
        self.parameters.set_limits(max_left, max_right);
    }

    /// リーダーから語彙ソースを読み込み、1行ずつ解析して取り込みます。
    ///
    /// 空行は読み飛ばされます。不正な行があった場合、その時点で
    /// コンパイル全体が失敗します。
    ///
    /// # 引数
    ///
    /// * `rdr` - 語彙ファイル`lex.csv`のリーダー
    ///
    /// # エラー
    ///
    /// 行の解析または検証に失敗した場合にエラーを返します。
    pub fn load<R>(&mut self, mut rdr: R) -> Result<()>
    where
        R: Read,
    {
        let mut buf = vec![];
        rdr.read_to_end(&mut buf)?;
        let text = std::str::from_utf8(&buf)?;

        for line in text.lines() {
            if line.is_empty() {
                continue;
            }
            let cols = utils::parse_csv_row(line);
            let entry = self.parse_row(&cols)?;
            self.add_entry(entry);
        }
        Ok(())
    }

    /// 1行分の列から単語エントリを解析・検証します。
    ///
    /// 列2(左接続ID)が番兵値`-1`の場合、このエントリは見出し語として
    /// 索引されません(他エントリの分割参照からのみ到達可能になります)。
    /// 副作用として、左右の接続IDとコストの三つ組がエントリ順に
    /// パラメータライターへ追加されます。
    ///
    /// # 引数
    ///
    /// * `cols` - 行を構成する列の並び
    ///
    /// # エラー
    ///
    /// 列数が不足している場合、フィールドが制約に違反している場合、
    /// または品詞タプルを解決できない場合にエラーを返します。
    pub fn parse_row(&mut self, cols: &[String]) -> Result<WordEntry> {
        if cols.len() < MIN_REQUIRED_NUMBER_OF_COLUMNS {
            return Err(LegatoError::structural("invalid format"));
        }

        let mut cols = cols.to_vec();
        for col in cols.iter_mut().take(NUM_ESCAPED_COLUMNS) {
            *col = unescape(col)?;
        }

        if cols[0].len() > MAX_STRING_BYTES
            || cols[4].len() > MAX_STRING_BYTES
            || cols[11].len() > MAX_STRING_BYTES
            || cols[12].len() > MAX_STRING_BYTES
        {
            return Err(LegatoError::validation("string is too long"));
        }
        if cols[0].is_empty() {
            return Err(LegatoError::validation("headword is empty"));
        }

        let headword = (cols[1] != "-1").then(|| cols[0].clone());

        let left_id = cols[1].parse()?;
        let right_id = cols[2].parse()?;
        let cost = cols[3].parse()?;
        self.parameters.add(left_id, right_id, cost);

        let pos = Pos::new([
            cols[5].clone(),
            cols[6].clone(),
            cols[7].clone(),
            cols[8].clone(),
            cols[9].clone(),
            cols[10].clone(),
        ]);
        let pos_id = self
            .pos_table
            .get_id(&pos)
            .ok_or_else(|| LegatoError::validation("invalid part of speech"))?;

        let a_unit_split_string = cols[15].clone();
        let b_unit_split_string = cols[16].clone();
        let word_structure_string = cols[17].clone();
        check_split_info_format(&a_unit_split_string)?;
        check_split_info_format(&b_unit_split_string)?;
        check_split_info_format(&word_structure_string)?;
        if cols[14] == "A" && (a_unit_split_string != "*" || b_unit_split_string != "*") {
            return Err(LegatoError::validation("invalid splitting"));
        }

        let synonym_group_ids = if cols.len() > MIN_REQUIRED_NUMBER_OF_COLUMNS {
            parse_synonym_group_ids(&cols[18])?
        } else {
            vec![]
        };

        let dictionary_form_word_id = if cols[13] == "*" {
            -1
        } else {
            cols[13].parse()?
        };

        let word_info = WordInfo {
            surface: cols[4].clone(),
            head_word_length: cols[0].len() as u16,
            pos_id,
            normalized_form: cols[12].clone(),
            dictionary_form_word_id,
            reading_form: cols[11].clone(),
            a_unit_split: vec![],
            b_unit_split: vec![],
            word_structure: vec![],
            synonym_group_ids,
        };

        Ok(WordEntry {
            headword,
            word_info,
            a_unit_split_string,
            b_unit_split_string,
            word_structure_string,
        })
    }

    /// 分割参照の生テキストを単語ID列へ解決します。
    ///
    /// `"*"`は空列を表します。それ以外は`/`で区切られ、各トークンが
    /// 独立に解決されます:
    ///
    /// - `U?\d+`に一致するトークンは数値IDです。`U`接頭辞付きのIDは、
    ///   リゾルバがユーザー辞書を対象とする場合にユーザー名前空間の
    ///   タグと合成されます。
    /// - それ以外のトークンは内容記述子
    ///   `表層形,品詞1..品詞6,読み`として解釈され、リゾルバの
    ///   逆引き索引で解決されます。
    ///
    /// # エラー
    ///
    /// 要素数が上限を超える場合、数値IDが範囲外の場合、または
    /// 内容記述子に一致する単語が見つからない場合にエラーを返します。
    pub fn parse_split_info<R>(&self, info: &str, resolver: &R) -> Result<Vec<i32>>
    where
        R: WordIdResolver,
    {
        if info == "*" {
            return Ok(vec![]);
        }
        let words: Vec<_> = info.split('/').collect();
        if words.len() > ARRAY_MAX_LENGTH {
            return Err(LegatoError::validation("too many units"));
        }
        let mut word_ids = Vec::with_capacity(words.len());
        for word in words {
            if PATTERN_ID.is_match(word) {
                word_ids.push(parse_id(word, resolver)?);
            } else {
                word_ids.push(self.word_to_id(word, resolver)?);
            }
        }
        Ok(word_ids)
    }

    /// 内容記述子`表層形,品詞1..品詞6,読み`を複合単語IDへ解決します。
    fn word_to_id<R>(&self, text: &str, resolver: &R) -> Result<i32>
    where
        R: WordIdResolver,
    {
        let cols: Vec<_> = text.split(',').collect();
        if cols.len() < 8 {
            return Err(LegatoError::structural("too few columns"));
        }
        let headword = unescape(cols[0])?;
        let pos = Pos::new([
            cols[1].to_string(),
            cols[2].to_string(),
            cols[3].to_string(),
            cols[4].to_string(),
            cols[5].to_string(),
            cols[6].to_string(),
        ]);
        let pos_id = self
            .pos_table
            .get_id(&pos)
            .ok_or_else(|| LegatoError::validation("invalid part of speech"))?;
        let reading = unescape(cols[7])?;
        resolver
            .lookup(&headword, pos_id, &reading)
            .ok_or_else(|| LegatoError::reference("not found such a word"))
    }

    /// 取り込み済みの全エントリをバイナリブロックとしてシンクへ書き出します。
    ///
    /// ブロックの構成は次のとおりです(多バイト整数はすべてリトルエンディアン):
    ///
    /// 1. エントリ数(4バイト)
    /// 2. パラメータセクション
    /// 3. オフセットテーブル(エントリごとに絶対オフセット4バイト)
    /// 4. 可変長のエントリペイロード
    ///
    /// オフセットテーブルの真の値はペイロードの書き出しが終わるまで
    /// 確定しないため、先に同サイズの領域を確保しておき、
    /// 全エントリの書き出し後にシークして埋め戻します。
    ///
    /// ペイロードは作業バッファ経由でストリーム書き出しされ、
    /// 残容量が低水位を下回るとフラッシュされます。各エントリの
    /// オフセットは、フラッシュ済みバイト数とバッファ内位置の和として
    /// 記録されます。
    ///
    /// # 引数
    ///
    /// * `resolver` - 分割参照の解決に使用するリゾルバ
    /// * `sink` - シーク可能な出力シンク
    ///
    /// # エラー
    ///
    /// 参照の解決に失敗した場合、またはシンクへの書き込みに失敗した場合に
    /// エラーを返します。エラー時のシンクの内容は未確定として
    /// 破棄される必要があります。
    pub fn write_to<R, W>(&self, resolver: &R, sink: &mut W) -> Result<()>
    where
        R: WordIdResolver,
        W: Write + Seek,
    {
        let num_entries = u32::try_from(self.entries.len())?;
        sink.write_all(&num_entries.to_le_bytes())?;

        self.parameters.write_to(sink)?;

        let offsets_position = sink.stream_position()?;
        sink.write_all(&vec![0; 4 * self.entries.len()])?;

        let mut offsets = Vec::with_capacity(self.entries.len());
        let mut buffer = ChunkBuffer::with_capacity(BUFFER_CAPACITY);
        let mut offset = sink.stream_position()?;
        for entry in &self.entries {
            if buffer.would_overflow(LOW_WATER) {
                offset += buffer.consume(sink)? as u64;
            }
            offsets.push(u32::try_from(offset + buffer.position() as u64)?);

            let info = &entry.word_info;
            buffer.put_str(&info.surface);
            buffer.put_u16(info.head_word_length);
            buffer.put_i16(info.pos_id);
            buffer.put_empty_if_equal(&info.normalized_form, &info.surface);
            buffer.put_i32(info.dictionary_form_word_id);
            buffer.put_empty_if_equal(&info.reading_form, &info.surface);
            buffer.put_i32s(&self.parse_split_info(&entry.a_unit_split_string, resolver)?);
            buffer.put_i32s(&self.parse_split_info(&entry.b_unit_split_string, resolver)?);
            buffer.put_i32s(&self.parse_split_info(&entry.word_structure_string, resolver)?);
            buffer.put_i32s(&info.synonym_group_ids);
        }
        buffer.consume(sink)?;

        let end_position = sink.stream_position()?;
        sink.seek(SeekFrom::Start(offsets_position))?;
        for offset in &offsets {
            sink.write_all(&offset.to_le_bytes())?;
        }
        sink.seek(SeekFrom::Start(end_position))?;
        Ok(())
    }
}

/// 数値IDトークンを複合単語IDへ解決します。
fn parse_id<R>(text: &str, resolver: &R) -> Result<i32>
where
    R: WordIdResolver,
{
    let id = if let Some(raw) = text.strip_prefix('U') {
        let raw: u32 = raw.parse()?;
        if resolver.lex_type() == LexType::User {
            word_id::make(LexType::User.dic_id(), raw)
        } else {
            i32::try_from(raw)?
        }
    } else {
        text.parse()?
    };
    resolver.validate(id)?;
    Ok(id)
}

/// 生の分割参照テキストの要素数を上限に対して検査します。
fn check_split_info_format(info: &str) -> Result<()> {
    if info.chars().filter(|&c| c == '/').count() + 1 > ARRAY_MAX_LENGTH {
        return Err(LegatoError::validation("too many units"));
    }
    Ok(())
}

/// `/`区切りの同義語グループIDリストを解析します。
fn parse_synonym_group_ids(text: &str) -> Result<Vec<i32>> {
    if text == "*" {
        return Ok(vec![]);
    }
    let ids: Vec<_> = text.split('/').collect();
    if ids.len() > ARRAY_MAX_LENGTH {
        return Err(LegatoError::validation("too many units"));
    }
    ids.iter().map(|id| Ok(id.parse()?)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::build::resolver::LexiconIndex;

    fn pos_table() -> PosTable {
        PosTable::new([
            Pos::new(["名詞", "普通名詞", "一般", "*", "*", "*"].map(String::from)),
            Pos::new(["名詞", "固有名詞", "地名", "一般", "*", "*"].map(String::from)),
        ])
        .unwrap()
    }

    fn cols(row: &str) -> Vec<String> {
        utils::parse_csv_row(row)
    }

    #[test]
    fn test_parse_row() {
        let pos_table = pos_table();
        let mut lexicon = CsvLexicon::new(&pos_table);
        let entry = lexicon
            .parse_row(&cols(
                "大学,1,1,100,大学,名詞,普通名詞,一般,*,*,*,ダイガク,大学,*,A,*,*,*",
            ))
            .unwrap();
        assert_eq!(entry.headword.as_deref(), Some("大学"));
        assert_eq!(entry.word_info.surface, "大学");
        assert_eq!(entry.word_info.head_word_length, 6);
        assert_eq!(entry.word_info.pos_id, 0);
        assert_eq!(entry.word_info.normalized_form, "大学");
        assert_eq!(entry.word_info.reading_form, "ダイガク");
        assert_eq!(entry.word_info.dictionary_form_word_id, -1);
        assert!(entry.word_info.synonym_group_ids.is_empty());
        assert_eq!(lexicon.parameters.len(), 1);
    }

    #[test]
    fn test_parse_row_few_cols() {
        let pos_table = pos_table();
        let mut lexicon = CsvLexicon::new(&pos_table);
        let result = lexicon.parse_row(&cols("大学,1,1,100,大学"));
        assert!(matches!(result, Err(LegatoError::Structural(_))));
    }

    #[test]
    fn test_parse_row_no_index_sentinel() {
        let pos_table = pos_table();
        let mut lexicon = CsvLexicon::new(&pos_table);
        let entry = lexicon
            .parse_row(&cols(
                "大学,-1,1,100,大学,名詞,普通名詞,一般,*,*,*,ダイガク,大学,*,A,*,*,*",
            ))
            .unwrap();
        assert_eq!(entry.headword, None);
        assert_eq!(entry.word_info.surface, "大学");
    }

    #[test]
    fn test_parse_row_empty_headword() {
        let pos_table = pos_table();
        let mut lexicon = CsvLexicon::new(&pos_table);
        let result = lexicon.parse_row(&cols(
            ",1,1,100,大学,名詞,普通名詞,一般,*,*,*,ダイガク,大学,*,A,*,*,*",
        ));
        assert!(matches!(result, Err(LegatoError::Validation(_))));
    }

    #[test]
    fn test_parse_row_invalid_pos() {
        let pos_table = pos_table();
        let mut lexicon = CsvLexicon::new(&pos_table);
        let result = lexicon.parse_row(&cols(
            "大学,1,1,100,大学,動詞,一般,*,*,*,*,ダイガク,大学,*,A,*,*,*",
        ));
        assert!(matches!(result, Err(LegatoError::Validation(_))));
    }

    #[test]
    fn test_parse_row_escaped_headword() {
        let pos_table = pos_table();
        let mut lexicon = CsvLexicon::new(&pos_table);
        let entry = lexicon
            .parse_row(&cols(
                "\\u5927\\u5b66,1,1,100,大学,名詞,普通名詞,一般,*,*,*,ダイガク,大学,*,A,*,*,*",
            ))
            .unwrap();
        assert_eq!(entry.headword.as_deref(), Some("大学"));
        assert_eq!(entry.word_info.head_word_length, 6);
    }

    #[test]
    fn test_parse_row_split_not_escaped() {
        // エスケープ解決は先頭15列のみが対象で、参照列はそのまま保持されます。
        let pos_table = pos_table();
        let mut lexicon = CsvLexicon::new(&pos_table);
        let entry = lexicon
            .parse_row(&cols(
                "大学,1,1,100,大学,名詞,普通名詞,一般,*,*,*,ダイガク,大学,*,B,\\u0030,*,*",
            ))
            .unwrap();
        assert_eq!(entry.a_unit_split_string, "\\u0030");
    }

    #[test]
    fn test_parse_row_dictionary_form() {
        let pos_table = pos_table();
        let mut lexicon = CsvLexicon::new(&pos_table);
        let entry = lexicon
            .parse_row(&cols(
                "大学,1,1,100,大学,名詞,普通名詞,一般,*,*,*,ダイガク,大学,5,A,*,*,*",
            ))
            .unwrap();
        assert_eq!(entry.word_info.dictionary_form_word_id, 5);
    }

    #[test]
    fn test_parse_row_synonym_group_ids() {
        let pos_table = pos_table();
        let mut lexicon = CsvLexicon::new(&pos_table);
        let entry = lexicon
            .parse_row(&cols(
                "大学,1,1,100,大学,名詞,普通名詞,一般,*,*,*,ダイガク,大学,*,A,*,*,*,1/5",
            ))
            .unwrap();
        assert_eq!(entry.word_info.synonym_group_ids, vec![1, 5]);
    }

    #[test]
    fn test_parse_id_system() {
        let pos_table = pos_table();
        let mut lexicon = CsvLexicon::new(&pos_table);
        for row in [
            "東,1,1,100,東,名詞,普通名詞,一般,*,*,*,ヒガシ,東,*,A,*,*,*",
            "西,1,1,100,西,名詞,普通名詞,一般,*,*,*,ニシ,西,*,A,*,*,*",
        ] {
            let entry = lexicon.parse_row(&cols(row)).unwrap();
            lexicon.add_entry(entry);
        }
        let index = LexiconIndex::from_entries(lexicon.entries());
        // システム辞書では`U`接頭辞は名前空間タグと合成されません。
        assert_eq!(parse_id("U1", &index).unwrap(), 1);
        assert_eq!(parse_id("1", &index).unwrap(), 1);
        assert!(parse_id("2", &index).is_err());
    }

    #[test]
    fn test_check_split_info_format() {
        assert!(check_split_info_format(&["0"; 127].join("/")).is_ok());
        assert!(check_split_info_format(&["0"; 128].join("/")).is_err());
    }

    #[test]
    fn test_parse_synonym_group_ids_limit() {
        assert_eq!(parse_synonym_group_ids("*").unwrap(), Vec::<i32>::new());
        assert_eq!(
            parse_synonym_group_ids(&["1"; 127].join("/")).unwrap().len(),
            127
        );
        assert!(parse_synonym_group_ids(&["1"; 128].join("/")).is_err());
    }
}
