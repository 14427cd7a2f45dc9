//! Simple logic-expression trees.
//!
//! `Expr` is the lowering source for `AigMgr::from_expr` and
//! `BddMgr::from_expr`, and the target of `SopCover::to_expr`. There is
//! deliberately no parser here; expressions are built with the
//! constructors and operator sugar below.
use std::fmt;
use crate::lit::Lit;

#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Expr {
  /// the constant 0 function.
  Zero,
  /// the constant 1 function.
  One,
  /// a single literal.
  Literal(Lit),
  And(Vec<Expr>),
  Or(Vec<Expr>),
  Xor(Vec<Expr>),
}

impl Expr {
  pub fn zero()->Expr { Expr::Zero }
  pub fn one()->Expr { Expr::One }
  pub fn posi_literal(var: u32)->Expr { Expr::Literal(Lit::positive(var)) }
  pub fn nega_literal(var: u32)->Expr { Expr::Literal(Lit::negative(var)) }
  pub fn literal(lit: Lit)->Expr { Expr::Literal(lit) }

  pub fn and(opers: Vec<Expr>)->Expr { Expr::And(opers) }
  pub fn or(opers: Vec<Expr>)->Expr { Expr::Or(opers) }
  pub fn xor(opers: Vec<Expr>)->Expr { Expr::Xor(opers) }

  pub fn is_zero(&self)->bool { matches!(self, Expr::Zero) }
  pub fn is_one(&self)->bool { matches!(self, Expr::One) }
  pub fn is_literal(&self)->bool { matches!(self, Expr::Literal(_)) }
  pub fn is_and(&self)->bool { matches!(self, Expr::And(_)) }
  pub fn is_or(&self)->bool { matches!(self, Expr::Or(_)) }
  pub fn is_xor(&self)->bool { matches!(self, Expr::Xor(_)) }

  /// the literal, when this is a literal node.
  pub fn lit(&self)->Option<Lit> {
    if let Expr::Literal(l) = self { Some(*l) } else { None }}

  /// the operand list, empty for leaves.
  pub fn operands(&self)->&[Expr] {
    match self {
      Expr::And(xs) | Expr::Or(xs) | Expr::Xor(xs) => xs.as_slice(),
      _ => &[] }}

  /// 1 + the largest variable index appearing in the expression.
  pub fn input_size(&self)->usize {
    match self {
      Expr::Zero | Expr::One => 0,
      Expr::Literal(l) => l.var() as usize + 1,
      Expr::And(xs) | Expr::Or(xs) | Expr::Xor(xs) =>
        xs.iter().map(|x| x.input_size()).max().unwrap_or(0) }}

  /// evaluate under an assignment (index = variable id).
  pub fn eval(&self, vals: &[bool])->bool {
    match self {
      Expr::Zero => false,
      Expr::One => true,
      Expr::Literal(l) => vals[l.var() as usize] ^ l.inv(),
      Expr::And(xs) => xs.iter().all(|x| x.eval(vals)),
      Expr::Or(xs) => xs.iter().any(|x| x.eval(vals)),
      Expr::Xor(xs) => xs.iter().fold(false, |a, x| a ^ x.eval(vals)) }}}

impl std::ops::BitAnd for Expr {
  type Output = Expr;
  fn bitand(self, rhs: Expr)->Expr {
    match (self, rhs) {
      (Expr::One, y) => y,
      (x, Expr::One) => x,
      (Expr::Zero, _) | (_, Expr::Zero) => Expr::Zero,
      (Expr::And(mut xs), Expr::And(ys)) => { xs.extend(ys); Expr::And(xs) }
      (Expr::And(mut xs), y) => { xs.push(y); Expr::And(xs) }
      (x, y) => Expr::And(vec![x, y]) }}}

impl std::ops::BitOr for Expr {
  type Output = Expr;
  fn bitor(self, rhs: Expr)->Expr {
    match (self, rhs) {
      (Expr::Zero, y) => y,
      (x, Expr::Zero) => x,
      (Expr::One, _) | (_, Expr::One) => Expr::One,
      (Expr::Or(mut xs), Expr::Or(ys)) => { xs.extend(ys); Expr::Or(xs) }
      (Expr::Or(mut xs), y) => { xs.push(y); Expr::Or(xs) }
      (x, y) => Expr::Or(vec![x, y]) }}}

impl std::ops::BitXor for Expr {
  type Output = Expr;
  fn bitxor(self, rhs: Expr)->Expr {
    match (self, rhs) {
      (Expr::Xor(mut xs), Expr::Xor(ys)) => { xs.extend(ys); Expr::Xor(xs) }
      (Expr::Xor(mut xs), y) => { xs.push(y); Expr::Xor(xs) }
      (x, y) => Expr::Xor(vec![x, y]) }}}

impl fmt::Display for Expr {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    fn join(f: &mut fmt::Formatter, xs: &[Expr], op: &str)->fmt::Result {
      write!(f, "(")?;
      for (i, x) in xs.iter().enumerate() {
        if i > 0 { write!(f, " {} ", op)?; }
        write!(f, "{}", x)?; }
      write!(f, ")") }
    match self {
      Expr::Zero => write!(f, "0"),
      Expr::One => write!(f, "1"),
      Expr::Literal(l) => write!(f, "{}", l),
      Expr::And(xs) => join(f, xs, "&"),
      Expr::Or(xs) => join(f, xs, "|"),
      Expr::Xor(xs) => join(f, xs, "^") }}}

impl fmt::Debug for Expr {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self) }}

#[test] fn test_expr_eval() {
  let x0 = Expr::posi_literal(0); let x1 = Expr::posi_literal(1);
  let e = (x0.clone() & x1.clone()) | (x0 ^ x1);  // x0 | x1
  assert_eq!(e.input_size(), 2);
  assert!(!e.eval(&[false, false]));
  assert!(e.eval(&[true, false]));
  assert!(e.eval(&[false, true]));
  assert!(e.eval(&[true, true])); }
