// Test suite for the BDD engine. Pulled into bdd.rs via include!().

#[test] fn test_consts() {
  let mgr = BddMgr::new();
  let zero = mgr.zero();
  let one = mgr.one();
  assert!(zero.is_zero());
  assert!(one.is_one());
  assert_eq!(zero.invert(), one);
  assert_eq!(&zero & &one, zero);
  assert_eq!(&zero | &one, one); }

#[test] fn test_from_truth() {
  let mgr = BddMgr::new();
  let f = mgr.from_truth("10010110").unwrap();
  // reading the string as bit i = str[7-i]:
  let want = [false, true, true, false, true, false, false, true];
  for i in 0..8 {
    let vals = [(i >> 2) & 1 != 0, (i >> 1) & 1 != 0, i & 1 != 0];
    assert_eq!(f.eval(&vals), want[i], "minterm {}", i); }}

#[test] fn test_from_truth_errors() {
  let mgr = BddMgr::new();
  assert!(mgr.from_truth("101").is_err(), "length must be a power of two");
  assert!(mgr.from_truth("10x1").is_err(), "only 0 and 1 are allowed");
  assert!(mgr.from_truth("1").unwrap().is_one());
  assert!(mgr.from_truth("0").unwrap().is_zero()); }

#[test] fn test_truth_roundtrip() {
  let mgr = BddMgr::new();
  for s in ["10010110", "0110", "11101000", "0000000011111111"] {
    let f = mgr.from_truth(s).unwrap();
    let n = s.len().trailing_zeros() as usize;
    let vars = (0..n).map(|i| mgr.variable(i)).collect::<Vec<_>>();
    assert_eq!(f.to_truth(&vars).unwrap(), s);
    assert_eq!(mgr.from_truth_vars(s, &vars).unwrap(), f); }}

#[test] fn test_canonicity() {
  let mgr = BddMgr::new();
  let x0 = mgr.variable(0).bdd();
  let x1 = mgr.variable(1).bdd();
  // two routes to the same function meet at the same root.
  let f = &x0 | &x1;
  let g = (&x0.invert() & &x1.invert()).invert();
  assert_eq!(f, g, "same function, same root");
  assert_eq!(&x0 ^ &x1, &x1 ^ &x0, "xor commutes to the same root"); }

#[test] fn test_xor_shape() {
  let mgr = BddMgr::new();
  let v0 = mgr.variable(0);
  let v1 = mgr.variable(1);
  let f = &v0.bdd() ^ &v1.bdd();
  assert_eq!(f.root_var().unwrap().id(), 0);
  assert_eq!(f.root_cofactor0(), v1.bdd());
  assert_eq!(f.root_cofactor1(), v1.bdd().invert()); }

#[test] fn test_ite() {
  let mgr = BddMgr::new();
  let c = mgr.variable(0).bdd();
  let t = mgr.variable(1).bdd();
  let e = mgr.variable(2).bdd();
  let f = c.ite(&t, &e);
  for m in 0..8 {
    let vals = [m & 4 != 0, m & 2 != 0, m & 1 != 0];
    let want = if vals[0] { vals[1] } else { vals[2] };
    assert_eq!(f.eval(&vals), want, "minterm {}", m); }
  // ite(c, 1, 0) is c itself.
  assert_eq!(c.ite(&mgr.one(), &mgr.zero()), c); }

#[test] fn test_cofactor_identity() {
  let mgr = BddMgr::new();
  let f = mgr.from_truth("01101100").unwrap();
  let v = mgr.variable(1);
  let f1 = f.cofactor_var(&v, false);
  let f0 = f.cofactor_var(&v, true);
  let x = v.bdd();
  let glued = &(&x & &f1) | &(&x.invert() & &f0);
  assert_eq!(glued, f, "f = x f|x + x' f|x'"); }

#[test] fn test_cofactor_cube() {
  let mgr = BddMgr::new();
  let x0 = mgr.variable(0).bdd();
  let x1 = mgr.variable(1).bdd();
  let x2 = mgr.variable(2).bdd();
  let f = &(&x0 & &x1) | &x2;
  let cube = &x0 & &x1.invert();
  // x0=1, x1=0 leaves x2.
  assert_eq!(f.cofactor_cube(&cube), x2); }

#[test] #[should_panic(expected = "invalid argument")]
fn test_cofactor_cube_rejects_non_cube() {
  let mgr = BddMgr::new();
  let x0 = mgr.variable(0).bdd();
  let x1 = mgr.variable(1).bdd();
  let f = &x0 | &x1;
  let _ = f.cofactor_cube(&f.clone()); }

#[test] fn test_compose() {
  let mgr = BddMgr::new();
  let v0 = mgr.variable(0);
  let x0 = v0.bdd();
  let x1 = mgr.variable(1).bdd();
  let x2 = mgr.variable(2).bdd();
  let f = &x0 & &x2;
  let g = &x1 | &x2;
  let h = f.compose(&v0, &g);
  assert_eq!(h, &(&x1 | &x2) & &x2);
  assert_eq!(h, &x2 & &g, "compose agrees with direct construction"); }

#[test] fn test_multi_compose_and_remap() {
  let mgr = BddMgr::new();
  let v0 = mgr.variable(0);
  let v1 = mgr.variable(1);
  let v2 = mgr.variable(2);
  let v3 = mgr.variable(3);
  let f = &(&v0.bdd() & &v1.bdd()) | &v2.bdd();
  // swap v0 and v1, send v2 to ~v3.
  let swapped = f.remap_vars(&[
    (v0.clone(), v1.posi_literal()),
    (v1.clone(), v0.posi_literal()),
    (v2.clone(), v3.nega_literal())]);
  let want = &(&v1.bdd() & &v0.bdd()) | &v3.bdd().invert();
  assert_eq!(swapped, want);
  // multi_compose with full functions.
  let g = f.multi_compose(&[(v2.clone(), &v0.bdd() ^ &v1.bdd())]);
  let want = &(&v0.bdd() & &v1.bdd()) | &(&v0.bdd() ^ &v1.bdd());
  assert_eq!(g, want); }

#[test] fn test_support() {
  let mgr = BddMgr::new();
  let v0 = mgr.variable(0);
  let v1 = mgr.variable(1);
  let v2 = mgr.variable(2);
  let _v3 = mgr.variable(3);
  let f = &(&v0.bdd() & &v1.bdd()) | &v2.bdd();
  let sup = f.support();
  assert_eq!(sup.len(), 3);
  assert_eq!(f.support_size(), 3);
  let vars = sup.to_varlist();
  let ids: Vec<u32> = vars.iter().map(|v| v.id()).collect();
  assert_eq!(ids, [0, 1, 2]);
  assert!(f.check_sup(&v1));
  assert!(!f.check_sup(&_v3)); }

#[test] fn test_varset_ops() {
  let mgr = BddMgr::new();
  let vars: Vec<BddVar> = (0..4).map(|i| mgr.variable(i)).collect();
  let a = BddVarSet::from_vars(&vars[0..3]);
  let b = BddVarSet::from_vars(&vars[1..4]);
  assert_eq!((&a & &b).to_varlist().len(), 2);
  assert_eq!((&a + &b).to_varlist().len(), 4);
  assert_eq!((&a - &b).to_varlist().len(), 1);
  assert!(a.check_intersect(&b)); }

#[test] fn test_check_sym() {
  let mgr = BddMgr::new();
  let v0 = mgr.variable(0);
  let v1 = mgr.variable(1);
  let v2 = mgr.variable(2);
  let f = &(&v0.bdd() & &v1.bdd()) | &v2.bdd();
  assert!(f.check_sym(&v0, &v1, false), "and is symmetric");
  let g = &v0.bdd() & &v1.bdd().invert();
  assert!(!g.check_sym(&v0, &v1, false));
  assert!(g.check_sym(&v0, &v1, true), "x0 x1' is symmetric under the inverting pairing");
  let h = &v0.bdd() ^ &v1.bdd();
  assert!(h.check_sym(&v0, &v1, false));
  assert!(h.check_sym(&v0, &v1, true)); }

#[test] fn test_paths_and_cubes() {
  let mgr = BddMgr::new();
  let v0 = mgr.variable(0);
  let v1 = mgr.variable(1);
  let f = &v0.bdd() & &v1.bdd().invert();
  assert!(f.is_cube());
  assert!(!f.is_posicube());
  assert!((&v0.bdd() & &v1.bdd()).is_posicube());
  assert!(v0.bdd().is_variable());
  assert!(v0.bdd().invert().is_literal());
  assert!(!f.is_variable());
  let lits = f.to_litlist();
  assert_eq!(lits.len(), 2);
  assert_eq!(lits[0].var().id(), 0);
  assert!(!lits[0].inv());
  assert!(lits[1].inv());
  // a one-path of any satisfiable function satisfies it.
  let g = &(&v0.bdd() & &v1.bdd()) | &(&v0.bdd().invert() & &v1.bdd().invert());
  let path = g.get_onepath();
  assert!(path.is_cube());
  let zp = g.get_zeropath();
  assert!(zp.is_cube());
  assert!(mgr.zero().get_onepath().is_zero()); }

#[test] fn test_dump_restore() {
  let mgr = BddMgr::new();
  let x0 = mgr.variable(0).bdd();
  let x1 = mgr.variable(1).bdd();
  let l = [&x0 & &x1, &x0 | &x1, &x0 ^ &x1];
  let mut bytes: Vec<u8> = vec![];
  mgr.dump_list(&mut bytes, &l).unwrap();
  let restored = mgr.restore(&bytes).unwrap();
  assert_eq!(restored.len(), 3);
  for (a, b) in l.iter().zip(&restored) {
    assert_eq!(a, b, "restore into the same manager is pointer-equal"); }}

#[test] fn test_dump_restore_other_manager() {
  let mgr = BddMgr::new();
  let x0 = mgr.variable(0).bdd();
  let x1 = mgr.variable(1).bdd();
  let f = &(&x0 & &x1) | &x1.invert();
  let mut bytes: Vec<u8> = vec![];
  f.dump(&mut bytes).unwrap();
  let mgr2 = BddMgr::new();
  let restored = mgr2.restore(&bytes).unwrap();
  assert_eq!(restored.len(), 1);
  assert!(restored[0].is_identical(&f)); }

#[test] fn test_restore_rejects_garbage() {
  let mgr = BddMgr::new();
  assert!(mgr.restore(b"not a dump").is_err()); }

#[test] fn test_is_identical_across_managers() {
  let mgr1 = BddMgr::new();
  let mgr2 = BddMgr::new();
  let f1 = { let a = mgr1.variable(0).bdd(); let b = mgr1.variable(1).bdd(); &a ^ &b };
  let f2 = { let a = mgr2.variable(0).bdd(); let b = mgr2.variable(1).bdd(); &a ^ &b };
  assert!(f1.is_identical(&f2));
  assert!(!f1.is_identical(&f2.invert())); }

#[test] fn test_copy_across_managers() {
  let mgr1 = BddMgr::new();
  let f = {
    let a = mgr1.variable(0).bdd();
    let b = mgr1.variable(1).bdd();
    let c = mgr1.variable(2).bdd();
    &(&a & &b) | &c.invert() };
  let mgr2 = BddMgr::new();
  let g = mgr2.copy(&f);
  assert!(g.is_identical(&f)); }

#[test] fn test_gc() {
  let mgr = BddMgr::new();
  mgr.disable_gc();
  let keep = {
    let a = mgr.variable(0).bdd();
    let b = mgr.variable(1).bdd();
    let junk = mgr.from_truth("0110100110010110").unwrap();
    drop(junk);
    &a & &b };
  let before = mgr.node_count();
  mgr.gc();
  assert!(mgr.node_count() < before, "the dropped graph gets collected");
  // the kept handle is untouched and canonical identity survives.
  let a = mgr.variable(0).bdd();
  let b = mgr.variable(1).bdd();
  assert_eq!(&a & &b, keep); }

#[test] fn test_gc_limit_doubles() {
  let mgr = BddMgr::new();
  let limit = mgr.gc_limit();
  mgr.gc();
  assert_eq!(mgr.gc_limit(), limit * 2); }

#[test] fn test_variable_order() {
  let mgr = BddMgr::new();
  let v0 = mgr.variable(0);
  let v1 = mgr.variable(1);
  mgr.set_variable_order(&[v1.clone(), v0.clone()]).unwrap();
  let order = mgr.variable_order();
  assert_eq!(order[0].id(), 1, "v1 is now topmost");
  let f = &v0.bdd() & &v1.bdd();
  assert_eq!(f.root_var().unwrap().id(), 1);
  // with real nodes alive, reordering is refused.
  assert!(mgr.set_variable_order(&[v0, v1]).is_err()); }

#[test] fn test_de_morgan() {
  let mgr = BddMgr::new();
  let a = mgr.variable(0).bdd();
  let b = mgr.variable(1).bdd();
  assert_eq!(&a | &b, (&a.invert() & &b.invert()).invert()); }

#[test] fn test_double_negation() {
  let mgr = BddMgr::new();
  let a = mgr.variable(0).bdd();
  let b = mgr.variable(1).bdd();
  let f = &a ^ &b;
  assert_eq!(f.invert().invert(), f); }

#[test] fn test_size_and_hash() {
  let mgr = BddMgr::new();
  let a = mgr.variable(0).bdd();
  let b = mgr.variable(1).bdd();
  let f = &a ^ &b;
  assert_eq!(f.size(), 2, "xor is two decision nodes");
  assert_eq!(Bdd::size_list(&[f.clone(), a.clone()]), 2, "shared nodes count once");
  assert_ne!(f.hash(), a.hash()); }

#[test] fn test_from_expr() {
  let mgr = BddMgr::new();
  let e = (Expr::posi_literal(0) & Expr::posi_literal(1)) ^ Expr::nega_literal(2);
  let f = mgr.from_expr(&e);
  for m in 0..8 {
    let vals = [m & 1 != 0, m & 2 != 0, m & 4 != 0];
    assert_eq!(f.eval(&vals), e.eval(&vals), "minterm {}", m); }}

#[test] fn test_display_and_dot() {
  let mgr = BddMgr::new();
  let a = mgr.variable(0).bdd();
  let b = mgr.variable(1).bdd();
  let f = &a & &b.invert();
  let mut s = String::new();
  f.display(&mut s).unwrap();
  assert!(s.contains("Root:"), "{}", s);
  let mut d = String::new();
  let opt = json::parse(r#"{"var_label": ["a", "b"]}"#).unwrap();
  f.gen_dot(&mut d, &opt).unwrap();
  assert!(d.starts_with("digraph bdd {"), "{}", d);
  assert!(d.contains("\"a\"") || d.contains("label = \"a\""), "{}", d); }

#[test] fn test_mixed_managers_panic() {
  let mgr1 = BddMgr::new();
  let mgr2 = BddMgr::new();
  let a = mgr1.variable(0).bdd();
  let b = mgr2.variable(0).bdd();
  let r = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| { let _ = &a & &b; }));
  assert!(r.is_err(), "mixing managers must be rejected"); }
