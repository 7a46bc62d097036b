//! 品詞タプルと品詞IDテーブル
//!
//! このモジュールは、6階層の品詞タプルと、タプルから品詞IDへの
//! 読み取り専用の逆引きテーブルを提供します。IDの割り当てポリシーは
//! このクレートの外部にあり、ここではタプルの順序付きリストから
//! 構築された参照専用のテーブルのみを扱います。

use std::fmt;
use std::io::Read;

use hashbrown::HashMap;

use crate::errors::{LegatoError, Result};
use crate::utils;

/// 品詞タプルの階層数
pub const POS_DEPTH: usize = 6;

/// 6階層の品詞タプル
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Pos {
    fields: [String; POS_DEPTH],
}

impl Pos {
    /// 新しい品詞タプルを作成します。
    pub const fn new(fields: [String; POS_DEPTH]) -> Self {
        Self { fields }
    }

    /// 各階層のフィールドを返します。
    #[inline(always)]
    pub fn fields(&self) -> &[String; POS_DEPTH] {
        &self.fields
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.fields.join(","))
    }
}

/// 品詞タプルから品詞IDへの逆引きテーブル
///
/// タプルの順序付きリストから構築され、リスト内の位置がそのまま
/// 品詞IDになります。IDは16ビット符号付き整数に収まる必要があります。
pub struct PosTable {
    ids: HashMap<Pos, i16>,
    table: Vec<Pos>,
}

impl PosTable {
    /// 品詞タプルの順序付きリストから新しいテーブルを構築します。
    ///
    /// 同一タプルが複数回現れた場合、最初の出現位置のIDが使用されます。
    ///
    /// # 引数
    ///
    /// * `tuples` - 品詞タプルのイテレータ
    ///
    /// # エラー
    ///
    /// タプル数が`i16::MAX`を超える場合にエラーを返します。
    pub fn new<I>(tuples: I) -> Result<Self>
    where
        I: IntoIterator<Item = Pos>,
    {
        let mut ids = HashMap::new();
        let mut table = vec![];
        for pos in tuples {
            let id = i16::try_from(table.len())
                .map_err(|_| LegatoError::validation("too many part-of-speech tuples"))?;
            ids.entry(pos.clone()).or_insert(id);
            table.push(pos);
        }
        Ok(Self { ids, table })
    }

    /// 1行につき1タプルのCSVデータからテーブルを構築します。
    ///
    /// # 引数
    ///
    /// * `rdr` - 品詞定義データのリーダー
    ///
    /// # エラー
    ///
    /// 行の列数が6未満の場合、またはタプル数が上限を超える場合にエラーを返します。
    pub fn from_reader<R>(mut rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut buf = vec![];
        rdr.read_to_end(&mut buf)?;
        let text = std::str::from_utf8(&buf)?;

        let mut tuples = vec![];
        for line in text.lines() {
            if line.is_empty() {
                continue;
            }
            let cols = utils::parse_csv_row(line);
            if cols.len() < POS_DEPTH {
                return Err(LegatoError::structural(format!(
                    "a part-of-speech row must have six fields, {line:?}",
                )));
            }
            let mut it = cols.into_iter();
            tuples.push(Pos::new(std::array::from_fn(|_| it.next().unwrap())));
        }
        Self::new(tuples)
    }

    /// タプルに対応する品詞IDを返します。
    ///
    /// # 戻り値
    ///
    /// テーブルに存在する場合は`Some(id)`、存在しない場合は`None`。
    #[inline(always)]
    pub fn get_id(&self, pos: &Pos) -> Option<i16> {
        self.ids.get(pos).copied()
    }

    /// IDに対応するタプルを返します。
    #[inline(always)]
    pub fn get(&self, pos_id: i16) -> Option<&Pos> {
        self.table.get(usize::try_from(pos_id).ok()?)
    }

    /// テーブル内のタプル数を返します。
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// テーブルが空かどうかを返します。
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
