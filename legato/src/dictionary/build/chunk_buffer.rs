//! 低水位フラッシュ付きの有界出力バッファ
//!
//! このモジュールは、エントリペイロードをストリーム書き出しするための
//! 作業バッファを提供します。バッファの残容量が低水位を下回った時点で
//! シンクへフラッシュすることで、辞書サイズに依存しない
//! ピークメモリ使用量を実現します。

use std::io::Write;

/// リトルエンディアンのバイナリレコードを蓄積する作業バッファ
pub struct ChunkBuffer {
    buf: Vec<u8>,
    capacity: usize,
}

impl ChunkBuffer {
    /// 指定した容量の新しいバッファを作成します。
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// バッファ内の現在の書き込み位置を返します。
    #[inline(always)]
    pub fn position(&self) -> usize {
        self.buf.len()
    }

    /// 追加の書き込みが容量を超えるかどうかを返します。
    #[inline(always)]
    pub fn would_overflow(&self, additional: usize) -> bool {
        self.buf.len() + additional > self.capacity
    }

    /// バッファの全内容をライターへ書き出し、バッファを空にします。
    ///
    /// # 戻り値
    ///
    /// 書き出したバイト数。
    pub fn consume<W>(&mut self, wtr: &mut W) -> std::io::Result<usize>
    where
        W: Write,
    {
        wtr.write_all(&self.buf)?;
        let nwritten = self.buf.len();
        self.buf.clear();
        Ok(nwritten)
    }

    #[inline(always)]
    pub fn put_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    #[inline(always)]
    pub fn put_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    #[inline(always)]
    pub fn put_i16(&mut self, value: i16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    #[inline(always)]
    pub fn put_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// 長さプレフィックス付きで文字列を書き込みます。
    ///
    /// UTF-8バイト長を`u16`で書いた後、バイト列本体が続きます。
    /// 呼び出し側は長さが`u16`に収まることを検証済みである必要があります。
    pub fn put_str(&mut self, text: &str) {
        debug_assert!(text.len() <= usize::from(u16::MAX));
        self.put_u16(text.len() as u16);
        self.buf.extend_from_slice(text.as_bytes());
    }

    /// 表層形と同一の文字列を空文字列へ圧縮して書き込みます。
    ///
    /// 読み出し側は空文字列を「表層形と同一」として展開します。
    pub fn put_empty_if_equal(&mut self, text: &str, surface: &str) {
        if text == surface {
            self.put_str("");
        } else {
            self.put_str(text);
        }
    }

    /// 要素数プレフィックス付きで単語ID列を書き込みます。
    ///
    /// 要素数を1バイトで書いた後、各要素が`i32`で続きます。
    /// 呼び出し側は要素数が127以下であることを検証済みである必要があります。
    pub fn put_i32s(&mut self, values: &[i32]) {
        debug_assert!(values.len() <= i8::MAX as usize);
        self.put_u8(values.len() as u8);
        for &value in values {
            self.put_i32(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_would_overflow() {
        let mut buffer = ChunkBuffer::with_capacity(8);
        assert!(!buffer.would_overflow(8));
        assert!(buffer.would_overflow(9));
        buffer.put_i32(1);
        assert!(!buffer.would_overflow(4));
        assert!(buffer.would_overflow(5));
    }

    #[test]
    fn test_consume_resets() {
        let mut buffer = ChunkBuffer::with_capacity(16);
        buffer.put_u16(0x0201);
        let mut sink = vec![];
        assert_eq!(buffer.consume(&mut sink).unwrap(), 2);
        assert_eq!(sink, vec![0x01, 0x02]);
        assert_eq!(buffer.position(), 0);
        assert_eq!(buffer.consume(&mut sink).unwrap(), 0);
    }

    #[test]
    fn test_put_str() {
        let mut buffer = ChunkBuffer::with_capacity(16);
        buffer.put_str("大学");
        let mut sink = vec![];
        buffer.consume(&mut sink).unwrap();
        assert_eq!(&sink[..2], &6u16.to_le_bytes());
        assert_eq!(&sink[2..], "大学".as_bytes());
    }

    #[test]
    fn test_put_empty_if_equal() {
        let mut buffer = ChunkBuffer::with_capacity(32);
        buffer.put_empty_if_equal("大学", "大学");
        buffer.put_empty_if_equal("ダイガク", "大学");
        let mut sink = vec![];
        buffer.consume(&mut sink).unwrap();
        assert_eq!(&sink[..2], &0u16.to_le_bytes());
        assert_eq!(&sink[2..4], &12u16.to_le_bytes());
        assert_eq!(&sink[4..], "ダイガク".as_bytes());
    }

    #[test]
    fn test_put_i32s() {
        let mut buffer = ChunkBuffer::with_capacity(32);
        buffer.put_i32s(&[3, -1]);
        let mut sink = vec![];
        buffer.consume(&mut sink).unwrap();
        assert_eq!(sink[0], 2);
        assert_eq!(&sink[1..5], &3i32.to_le_bytes());
        assert_eq!(&sink[5..9], &(-1i32).to_le_bytes());
    }
}
