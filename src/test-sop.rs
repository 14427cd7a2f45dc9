// Test suite for the SOP algebra. Pulled into sop.rs via include!().

#[cfg(test)]
fn pos(v: u32)->Lit { Lit::positive(v) }
#[cfg(test)]
fn neg(v: u32)->Lit { Lit::negative(v) }

#[test] fn test_cube_basics() {
  let c = SopCube::from_lits(4, &[pos(0), neg(2)]);
  assert_eq!(c.variable_num(), 4);
  assert_eq!(c.literal_num(), 2);
  assert_eq!(c.get_pat(0), 1);
  assert_eq!(c.get_pat(1), 0);
  assert_eq!(c.get_pat(2), 2);
  assert!(c.has_lit(pos(0)));
  assert!(!c.has_lit(neg(0)));
  assert_eq!(c.literal_list(), vec![pos(0), neg(2)]);
  assert!(SopCube::new(4).is_universal());
  assert!(!c.is_universal()); }

#[test] fn test_cube_product() {
  let a = SopCube::from_lits(4, &[pos(0)]);
  let b = SopCube::from_lits(4, &[pos(1), neg(3)]);
  let ab = a.product(&b).unwrap();
  assert_eq!(ab.literal_list(), vec![pos(0), pos(1), neg(3)]);
  // overlapping agreeing literals are fine.
  assert_eq!(ab.product(&b).unwrap(), ab);
  // conflicting literals empty the product.
  let nb = SopCube::from_lits(4, &[neg(1)]);
  assert!(ab.product(&nb).is_none()); }

#[test] fn test_cube_quotient() {
  let abc = SopCube::from_lits(4, &[pos(0), pos(1), neg(2)]);
  let b = SopCube::from_lits(4, &[pos(1)]);
  let q = abc.quotient(&b).unwrap();
  assert_eq!(q.literal_list(), vec![pos(0), neg(2)]);
  // dividing by something not contained fails.
  let d = SopCube::from_lits(4, &[pos(3)]);
  assert!(abc.quotient(&d).is_none());
  assert_eq!(abc.quotient_lit(pos(0)).unwrap().literal_list(), vec![pos(1), neg(2)]);
  assert!(abc.quotient_lit(neg(0)).is_none()); }

#[test] fn test_cube_relations() {
  let big = SopCube::from_lits(4, &[pos(0), pos(1)]);
  let small = SopCube::from_lits(4, &[pos(0)]);
  assert!(big.check_containment(&small), "x0 x1 implies x0");
  assert!(!small.check_containment(&big));
  assert!(big.check_intersect(&small));
  let other = SopCube::from_lits(4, &[neg(0)]);
  assert!(!big.check_intersect(&other)); }

#[test] #[should_panic(expected = "invalid argument")]
fn test_cube_mixed_width_panics() {
  let a = SopCube::from_lits(4, &[pos(0)]);
  let b = SopCube::from_lits(5, &[pos(0)]);
  let _ = a.product(&b); }

#[test] fn test_cover_sorted_and_deduped() {
  let f = SopCover::from_lits(4, &[
    vec![pos(3)],
    vec![pos(0), pos(1)],
    vec![pos(3)],
    vec![pos(0), pos(2)]]);
  assert_eq!(f.cube_num(), 3, "duplicates collapse");
  for i in 1..f.cube_num() {
    assert!(f.get_cube(i - 1) > f.get_cube(i),
            "cubes must be strictly descending"); }}

#[test] fn test_cover_sum_diff() {
  let a = SopCover::from_lits(4, &[vec![pos(0)], vec![pos(1)]]);
  let b = SopCover::from_lits(4, &[vec![pos(1)], vec![pos(2)]]);
  let s = &a + &b;
  assert_eq!(s.cube_num(), 3);
  let d = &s - &b;
  assert_eq!(d.cube_num(), 1);
  assert_eq!(d.get_cube(0).literal_list(), vec![pos(0)]); }

#[test] fn test_cover_product() {
  let a = SopCover::from_lits(3, &[vec![pos(0)], vec![neg(1)]]);
  let b = SopCover::from_lits(3, &[vec![pos(1)]]);
  let p = &a * &b;
  // (x0 + x1')(x1) = x0 x1; the conflicting pair disappears.
  assert_eq!(p.cube_num(), 1);
  assert_eq!(p.get_cube(0).literal_list(), vec![pos(0), pos(1)]);
  // product against a literal.
  let pl = &a * pos(2);
  assert_eq!(pl.cube_num(), 2);
  for i in 0..pl.cube_num() { assert!(pl.get_cube(i).has_lit(pos(2))); }}

#[test] fn test_product_distributes() {
  let a = SopCover::from_lits(4, &[vec![pos(0)], vec![pos(1), neg(2)]]);
  let b = SopCover::from_lits(4, &[vec![neg(0), pos(3)]]);
  let c = SopCover::from_lits(4, &[vec![pos(2)], vec![pos(3)]]);
  let lhs = &(&a + &b) * &c;
  let rhs = &(&a * &c) + &(&b * &c);
  assert_eq!(lhs, rhs, "(A + B) C == A C + B C after sort-unique"); }

#[test] fn test_algebraic_division() {
  // F = x0 x1 + x0 x2 + x3, G = x1 + x2.
  let f = SopCover::from_lits(4, &[
    vec![pos(0), pos(1)],
    vec![pos(0), pos(2)],
    vec![pos(3)]]);
  let g = SopCover::from_lits(4, &[vec![pos(1)], vec![pos(2)]]);
  let q = &f / &g;
  assert_eq!(q.cube_num(), 1);
  assert_eq!(q.get_cube(0).literal_list(), vec![pos(0)]);
  let rem = &f - &(&g * &q);
  assert_eq!(rem.cube_num(), 1);
  assert_eq!(rem.get_cube(0).literal_list(), vec![pos(3)]);
  // dividing by the empty cover yields the empty cover.
  assert_eq!((&f / &SopCover::new(4)).cube_num(), 0); }

#[test] fn test_quotient_cube_lit() {
  let f = SopCover::from_lits(4, &[
    vec![pos(0), pos(1)],
    vec![pos(0), pos(2)],
    vec![pos(3)]]);
  let c = SopCube::from_lits(4, &[pos(0)]);
  let q = &f / &c;
  assert_eq!(q.cube_num(), 2);
  let ql = &f / pos(0);
  assert_eq!(q, ql);
  assert_eq!(ql.get_cube(0).literal_list(), vec![pos(1)]);
  assert_eq!(ql.get_cube(1).literal_list(), vec![pos(2)]); }

#[test] fn test_cofactor() {
  let f = SopCover::from_lits(3, &[
    vec![pos(0), pos(1)],
    vec![neg(0), pos(2)],
    vec![pos(2)]]);
  let f1 = f.cofactor(pos(0));
  // x0=1: x1 + x2.
  assert_eq!(f1.cube_num(), 2);
  assert!(f1.eval(&[false, true, false]));
  assert!(f1.eval(&[false, false, true]));
  assert!(!f1.eval(&[false, false, false])); }

#[test] fn test_common_cube() {
  let f = SopCover::from_lits(4, &[
    vec![pos(0), pos(1), neg(3)],
    vec![pos(0), neg(3), pos(2)]]);
  let cc = f.common_cube();
  assert_eq!(cc.literal_list(), vec![pos(0), neg(3)]);
  let g = SopCover::from_lits(4, &[vec![pos(0)], vec![pos(1)]]);
  assert!(g.common_cube().is_universal()); }

#[test] fn test_complement_exhaustive() {
  let samples = [
    SopCover::from_lits(3, &[vec![pos(0), pos(1)], vec![neg(0), pos(2)]]),
    SopCover::from_lits(3, &[vec![pos(0)], vec![pos(1)], vec![pos(2)]]),
    SopCover::from_lits(3, &[vec![pos(0), neg(1), pos(2)]]),
    SopCover::from_lits(3, &[vec![neg(0)], vec![pos(0), pos(1)]]),
    SopCover::new(3),
    SopCover::tautology(3),
  ];
  for f in &samples {
    let fc = f.complement();
    for m in 0..8 {
      let vals = [m & 1 != 0, m & 2 != 0, m & 4 != 0];
      assert_eq!(fc.eval(&vals), !f.eval(&vals),
                 "complement of {} at minterm {}", f, m); }
    // the cover invariants hold on the result too.
    for i in 1..fc.cube_num() {
      assert!(fc.get_cube(i - 1) > fc.get_cube(i)); }}}

#[test] fn test_cube_complement() {
  let c = SopCube::from_lits(3, &[pos(0), neg(1)]);
  let cc = c.complement();
  assert_eq!(cc.cube_num(), 2);
  for m in 0..8 {
    let vals = [m & 1 != 0, m & 2 != 0, m & 4 != 0];
    assert_eq!(cc.eval(&vals), !c.eval(&vals), "minterm {}", m); }}

#[test] fn test_literal_counts() {
  let f = SopCover::from_lits(4, &[
    vec![pos(0), pos(1)],
    vec![pos(0), pos(2)],
    vec![pos(3)]]);
  assert_eq!(f.literal_num(), 5);
  assert_eq!(f.literal_num_lit(pos(0)), 2);
  assert_eq!(f.literal_num_lit(neg(0)), 0);
  assert_eq!(f.literal_num_lit(pos(3)), 1); }

#[test] fn test_to_expr() {
  let f = SopCover::from_lits(3, &[vec![pos(0), neg(1)], vec![pos(2)]]);
  let e = f.to_expr();
  for m in 0..8 {
    let vals = [m & 1 != 0, m & 2 != 0, m & 4 != 0];
    assert_eq!(e.eval(&vals), f.eval(&vals), "minterm {}", m); }}

#[test] fn test_hash_and_compare() {
  let a = SopCover::from_lits(4, &[vec![pos(0)], vec![pos(1)]]);
  let b = SopCover::from_lits(4, &[vec![pos(1)], vec![pos(0)]]);
  assert_eq!(a, b, "construction order is invisible after sorting");
  assert_eq!(a.hash(), b.hash());
  let c = SopCover::from_lits(4, &[vec![pos(0)]]);
  assert_ne!(a, c);
  assert_ne!(a.compare(&c), std::cmp::Ordering::Equal); }

#[test] fn test_display() {
  let f = SopCover::from_lits(3, &[vec![pos(0), neg(1)], vec![pos(2)]]);
  let s = format!("{}", f);
  assert!(s.contains(" + "), "{}", s);
  assert!(s.contains("v1'"), "{}", s);
  let c = SopCube::from_lits(3, &[pos(0), neg(1)]);
  assert_eq!(format!("{}", c), "v0 v1'"); }
