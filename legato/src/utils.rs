//! CSV行処理のためのユーティリティ関数
//!
//! このモジュールは、語彙ソースのCSV行を解析するためのヘルパーを提供します。

use csv_core::ReadFieldResult;

/// CSV形式の行を解析してフィールドのベクターに分割する
///
/// この関数は、CSV形式の文字列を解析し、各フィールドを個別の文字列として抽出します。
/// ダブルクォートで囲まれたフィールドや、フィールド内のカンマも正しく処理します。
///
/// # 引数
///
/// * `row` - 解析するCSV形式の文字列
///
/// # 戻り値
///
/// 解析されたフィールドを格納する文字列のベクター
///
/// # 例
///
/// ```
/// # use legato::utils::parse_csv_row;
/// let fields = parse_csv_row("大学,名詞");
/// assert_eq!(fields, vec!["大学", "名詞"]);
///
/// let fields_with_quote = parse_csv_row("名詞,\"1,2-ジクロロエタン\"");
/// assert_eq!(fields_with_quote, vec!["名詞", "1,2-ジクロロエタン"]);
/// ```
pub fn parse_csv_row(row: &str) -> Vec<String> {
    let mut fields = vec![];
    let mut rdr = csv_core::Reader::new();
    let mut bytes = row.as_bytes();
    let mut output = [0; 4096];
    let mut field = vec![];
    loop {
        let (result, nin, nout) = rdr.read_field(bytes, &mut output);
        field.extend_from_slice(&output[..nout]);
        let end = match result {
            // The field did not fit into the scratch buffer in one call.
            ReadFieldResult::OutputFull => false,
            ReadFieldResult::Field { .. } => {
                fields.push(String::from_utf8(std::mem::take(&mut field)).unwrap());
                false
            }
            ReadFieldResult::InputEmpty | ReadFieldResult::End => {
                fields.push(String::from_utf8(std::mem::take(&mut field)).unwrap());
                true
            }
        };
        if end {
            break;
        }
        bytes = &bytes[nin..];
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_row() {
        assert_eq!(&["大学", "名詞"], parse_csv_row("大学,名詞").as_slice());
    }

    #[test]
    fn test_parse_csv_row_with_quote() {
        assert_eq!(
            &["名詞", "1,2-ジクロロエタン"],
            parse_csv_row("名詞,\"1,2-ジクロロエタン\"").as_slice()
        );
    }

    #[test]
    fn test_parse_csv_row_empty_fields() {
        assert_eq!(&["a", "", "c"], parse_csv_row("a,,c").as_slice());
    }

    #[test]
    fn test_parse_csv_row_long_field() {
        let long = "あ".repeat(3000);
        let row = format!("{long},x");
        assert_eq!(&[long.as_str(), "x"], parse_csv_row(&row).as_slice());
    }
}
