//! Binary io helpers for the dump/restore format.
//!
//! The format needs only two primitives: a fixed ASCII signature and
//! unsigned variable-length integers (7 bits per byte, low group first,
//! high bit of each byte marking continuation).
use std::io::{Read, Write};
use crate::err::{Error, Result};

/// Encoder wrapping any `Write`.
pub struct BinEnc<'a> { w: &'a mut dyn Write }

impl<'a> BinEnc<'a> {
  pub fn new(w: &'a mut dyn Write)->Self { BinEnc { w }}

  /// write the raw bytes of an ASCII signature.
  pub fn write_signature(&mut self, sig: &str)->Result<()> {
    self.w.write_all(sig.as_bytes()).map_err(|e| Error::logic_error(e.to_string())) }

  /// write an unsigned varint.
  pub fn write_vint(&mut self, mut val: u64)->Result<()> {
    loop {
      let mut byte = (val & 0x7f) as u8;
      val >>= 7;
      if val != 0 { byte |= 0x80; }
      self.w.write_all(&[byte]).map_err(|e| Error::logic_error(e.to_string()))?;
      if val == 0 { return Ok(()) }}}}

/// Decoder wrapping any `Read`.
pub struct BinDec<'a> { r: &'a mut dyn Read }

impl<'a> BinDec<'a> {
  pub fn new(r: &'a mut dyn Read)->Self { BinDec { r }}

  fn read_byte(&mut self)->Result<u8> {
    let mut buf = [0u8; 1];
    self.r.read_exact(&mut buf)
      .map_err(|_| Error::invalid_argument("unexpected end of stream"))?;
    Ok(buf[0]) }

  /// read and check an ASCII signature; Ok(false) on mismatch.
  pub fn read_signature(&mut self, sig: &str)->Result<bool> {
    let mut buf = vec![0u8; sig.len()];
    self.r.read_exact(&mut buf)
      .map_err(|_| Error::invalid_argument("unexpected end of stream"))?;
    Ok(buf == sig.as_bytes()) }

  /// read an unsigned varint.
  pub fn read_vint(&mut self)->Result<u64> {
    let mut val: u64 = 0;
    let mut shift = 0;
    loop {
      let byte = self.read_byte()?;
      if shift >= 64 {
        return Err(Error::invalid_argument("varint too long")) }
      val |= ((byte & 0x7f) as u64) << shift;
      if byte & 0x80 == 0 { return Ok(val) }
      shift += 7; }}}

#[test] fn test_vint_roundtrip() {
  let mut buf: Vec<u8> = vec![];
  { let mut enc = BinEnc::new(&mut buf);
    for &v in &[0u64, 1, 127, 128, 300, 1 << 20, u64::MAX] {
      enc.write_vint(v).unwrap(); }}
  let mut slice = &buf[..];
  let mut dec = BinDec::new(&mut slice);
  for &v in &[0u64, 1, 127, 128, 300, 1 << 20, u64::MAX] {
    assert_eq!(dec.read_vint().unwrap(), v); }}

#[test] fn test_signature() {
  let mut buf: Vec<u8> = vec![];
  BinEnc::new(&mut buf).write_signature("ym_bdd1.0").unwrap();
  let mut slice = &buf[..];
  assert!(BinDec::new(&mut slice).read_signature("ym_bdd1.0").unwrap());
  let mut slice = &buf[..];
  assert!(!BinDec::new(&mut slice).read_signature("ym_zdd1.0").unwrap()); }
