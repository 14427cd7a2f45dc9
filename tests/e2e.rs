//! End-to-end scenarios across the three engines.
use bdag::{AigMgr, BddMgr, Expr, Lit, SopCover};

fn init_logging() {
  // ignore the error when a second test initializes it again.
  let _ = simplelog::SimpleLogger::init(simplelog::LevelFilter::Debug,
                                        simplelog::Config::default()); }

/// every minterm of an n-variable function as bit-parallel input seeds.
fn seeds(n: usize)->Vec<u64> {
  (0..n).map(|i| {
    let mut v: u64 = 0;
    for m in 0..(1u64 << n) {
      if (m >> i) & 1 != 0 { v |= 1 << m; }}
    v }).collect() }

#[test] fn cover_to_aig_to_bdd_agree() {
  init_logging();
  // x0 x1 + x0 x2' + x3
  let cover = SopCover::from_lits(4, &[
    vec![Lit::positive(0), Lit::positive(1)],
    vec![Lit::positive(0), Lit::negative(2)],
    vec![Lit::positive(3)]]);
  let aig = AigMgr::new();
  let h = aig.from_cover(&cover);
  let bdds = BddMgr::new();
  let f = bdds.from_expr(&cover.to_expr());
  let s = seeds(4);
  let av = h.eval(&s);
  for m in 0..16u64 {
    let vals: Vec<bool> = (0..4).map(|i| (m >> i) & 1 != 0).collect();
    let want = cover.eval(&vals);
    assert_eq!((av >> m) & 1 == 1, want, "aig wrong at minterm {}", m);
    assert_eq!(f.eval(&vals), want, "bdd wrong at minterm {}", m); }}

#[test] fn rewrite_shrinks_and_preserves() {
  init_logging();
  let aig = AigMgr::new();
  let ins: Vec<_> = (0..4).map(|_| aig.make_input()).collect();
  // a two-level form of a 4-input majority-ish function with shared cones.
  let t1 = aig.and_many(&[ins[0].clone(), ins[1].clone(), ins[2].clone(), ins[3].clone()]);
  let t2 = aig.and_many(&[ins[0].clone(), ins[1].clone(), ins[2].clone(), !&ins[3]]);
  let t3 = aig.and_many(&[ins[0].clone(), ins[1].clone(), !&ins[2], ins[3].clone()]);
  let f = aig.or_many(&[t1, t2, t3]);
  let s = seeds(4);
  let before = f.eval(&s) & 0xffff;
  let n_before = aig.and_count();
  aig.rewrite();
  assert_eq!(f.eval(&s) & 0xffff, before, "rewrite changed the function");
  assert!(aig.and_count() <= n_before);
  // sweeping afterwards leaves only what the handles pin.
  aig.sweep();
  assert_eq!(f.eval(&s) & 0xffff, before); }

#[test] fn expr_through_all_three() {
  init_logging();
  let e = (Expr::posi_literal(0) ^ Expr::posi_literal(1))
        | (Expr::posi_literal(2) & Expr::nega_literal(0));
  let aig = AigMgr::new();
  let h = aig.from_expr(&e);
  let bdds = BddMgr::new();
  let f = bdds.from_expr(&e);
  let s = seeds(3);
  let av = h.eval(&s);
  for m in 0..8u64 {
    let vals: Vec<bool> = (0..3).map(|i| (m >> i) & 1 != 0).collect();
    let want = e.eval(&vals);
    assert_eq!((av >> m) & 1 == 1, want, "aig at {}", m);
    assert_eq!(f.eval(&vals), want, "bdd at {}", m); }}

#[test] fn bdd_dump_restore_roundtrip_via_bytes() {
  init_logging();
  let mgr = BddMgr::new();
  let x: Vec<_> = (0..3).map(|i| mgr.variable(i).bdd()).collect();
  let fns = [
    &(&x[0] & &x[1]) | &x[2],
    &x[0] ^ &(&x[1] ^ &x[2]),
    (&x[0] | &x[1]).invert(),
  ];
  let mut bytes = vec![];
  mgr.dump_list(&mut bytes, &fns).unwrap();
  let restored = mgr.restore(&bytes).unwrap();
  for (a, b) in fns.iter().zip(&restored) {
    assert_eq!(a, b, "same manager restores pointer-equal"); }
  // and across managers the functions stay identical.
  let mgr2 = BddMgr::new();
  let far = mgr2.restore(&bytes).unwrap();
  for (a, b) in fns.iter().zip(&far) {
    assert!(b.is_identical(a)); }}

#[test] fn sop_complement_against_bdd() {
  init_logging();
  let cover = SopCover::from_lits(4, &[
    vec![Lit::positive(0), Lit::negative(1)],
    vec![Lit::positive(1), Lit::positive(2), Lit::negative(3)],
    vec![Lit::negative(0), Lit::negative(2)]]);
  let compl = cover.complement();
  let mgr = BddMgr::new();
  let f = mgr.from_expr(&cover.to_expr());
  let fc = mgr.from_expr(&compl.to_expr());
  assert_eq!(fc, f.invert(), "sop complement matches the bdd complement"); }
