// Test suite for the AIG engine. Pulled into aig.rs via include!().

#[test] fn test_and_many() {
  let mgr = AigMgr::new();
  let i0 = mgr.make_input();
  let i1 = mgr.make_input();
  let i2 = mgr.make_input();
  let h = mgr.and_many(&[i0, i1, i2]);
  assert_eq!(mgr.node_count(), 5, "three inputs and two ands");
  assert_eq!(mgr.and_count(), 2);
  // eight assignments at once: input i carries its seed pattern.
  let v = h.eval(&[0xaa, 0xcc, 0xf0]);
  assert_eq!(v & 0xff, 0x80, "only the all-ones assignment satisfies and3");
  assert_eq!(h.eval(&[!0, !0, !0]) & 1, 1);
  assert_eq!(h.eval(&[!0, 0, !0]) & 1, 0); }

#[test] fn test_sweep() {
  let mgr = AigMgr::new();
  let i0 = mgr.make_input();
  let i1 = mgr.make_input();
  let i2 = mgr.make_input();
  let h = mgr.and_many(&[i0, i1, i2]);
  drop(h);
  mgr.sweep();
  assert_eq!(mgr.and_count(), 0, "unreferenced ands are reclaimed");
  assert_eq!(mgr.node_count(), 3, "inputs survive every sweep"); }

#[test] fn test_structural_hash() {
  let mgr = AigMgr::new();
  let a = mgr.make_input();
  let b = mgr.make_input();
  let ab = mgr.and(&a, &b);
  let ab2 = mgr.and(&a, &b);
  let ba = mgr.and(&b, &a);
  assert_eq!(ab, ab2, "same pair, same node");
  assert_eq!(ab, ba, "the structural hash is order-insensitive");
  assert_eq!(mgr.and_count(), 1); }

#[test] fn test_trivial_cases() {
  let mgr = AigMgr::new();
  let a = mgr.make_input();
  let zero = AigHandle::zero();
  let one = AigHandle::one();
  assert_eq!(&a & &zero, zero);
  assert_eq!(&a & &one, a);
  assert_eq!(&a & &a, a);
  assert_eq!(&a & &!&a, zero);
  assert_eq!(&a | &zero, a);
  assert_eq!(&a | &one, one);
  assert_eq!(&a ^ &a, zero);
  assert_eq!(&a ^ &one, !&a);
  assert_eq!(mgr.and_count(), 0, "trivial cases never allocate"); }

#[test] fn test_double_negation() {
  let mgr = AigMgr::new();
  let a = mgr.make_input();
  let b = mgr.make_input();
  let h = mgr.and(&a, &b);
  assert_eq!(!&!&h, h); }

#[test] fn test_de_morgan() {
  let mgr = AigMgr::new();
  let a = mgr.make_input();
  let b = mgr.make_input();
  let lhs = &a | &b;
  let rhs = !&(&!&a & &!&b);
  assert_eq!(lhs, rhs, "or must reuse the and node through De Morgan"); }

#[test] fn test_handle_accessors() {
  let mgr = AigMgr::new();
  let a = mgr.make_input();
  let b = mgr.make_input();
  assert!(a.is_input());
  assert_eq!(a.input_id(), 0);
  assert_eq!(b.input_id(), 1);
  let h = mgr.and(&a, &!&b);
  assert!(h.is_and());
  assert!(!h.is_const());
  let f0 = h.fanin0();
  let f1 = h.fanin1();
  assert_eq!(f0, a);
  assert_eq!(f1, !&b);
  assert!(f1.inv()); }

#[test] fn test_ex_fanin_list() {
  let mgr = AigMgr::new();
  let a = mgr.make_input();
  let b = mgr.make_input();
  let c = mgr.make_input();
  let h = mgr.and_many(&[a.clone(), b.clone(), c.clone()]);
  let leaves = h.ex_fanin_list();
  assert_eq!(leaves.len(), 3);
  assert!(leaves.contains(&a) && leaves.contains(&b) && leaves.contains(&c)); }

#[test] fn test_primitive_op() {
  let mgr = AigMgr::new();
  let a = mgr.make_input();
  let b = mgr.make_input();
  let nand = mgr.primitive_op(PrimOp::Nand, &[a.clone(), b.clone()]);
  assert_eq!(nand, !&mgr.and(&a, &b));
  let xnor = mgr.primitive_op(PrimOp::Xnor, &[a.clone(), b.clone()]);
  assert_eq!(xnor.eval(&[0b1100, 0b1010]) & 0xf, 0b1001);
  assert_eq!(mgr.primitive_op(PrimOp::Zero, &[]), AigHandle::zero()); }

#[test] fn test_from_expr() {
  let mgr = AigMgr::new();
  // (x0 & x1) | ~x2
  let e = (Expr::posi_literal(0) & Expr::posi_literal(1)) | Expr::nega_literal(2);
  let h = mgr.from_expr(&e);
  assert_eq!(mgr.input_count(), 3);
  for m in 0..8u64 {
    let vals: Vec<AigBitVect> = (0..3).map(|i| if (m >> i) & 1 != 0 { !0 } else { 0 }).collect();
    let want = e.eval(&[m & 1 != 0, m & 2 != 0, m & 4 != 0]);
    assert_eq!(h.eval(&vals) & 1 == 1, want, "minterm {}", m); }}

#[test] fn test_from_cover() {
  let mgr = AigMgr::new();
  // x0 x1 + x2'
  let cover = SopCover::from_lits(3, &[
    vec![Lit::positive(0), Lit::positive(1)],
    vec![Lit::negative(2)]]);
  let h = mgr.from_cover(&cover);
  for m in 0..8u64 {
    let vals: Vec<bool> = (0..3).map(|i| (m >> i) & 1 != 0).collect();
    let bits: Vec<AigBitVect> = vals.iter().map(|&v| if v { !0 } else { 0 }).collect();
    assert_eq!(h.eval(&bits) & 1 == 1, cover.eval(&vals), "minterm {}", m); }}

#[test] fn test_from_cube() {
  let mgr = AigMgr::new();
  let cube = SopCube::from_lits(3, &[Lit::positive(0), Lit::negative(2)]);
  let h = mgr.from_cube(&cube);
  assert_eq!(h.eval(&[!0, 0, 0]) & 1, 1);
  assert_eq!(h.eval(&[!0, 0, !0]) & 1, 0);
  // the universal cube lowers to the one-edge.
  assert!(mgr.from_cube(&SopCube::new(3)).is_one()); }

#[test] fn test_cofactor() {
  let mgr = AigMgr::new();
  let a = mgr.make_input();
  let b = mgr.make_input();
  let h = mgr.and(&a, &b);
  // fixing a to 1 leaves b.
  let res = h.cofactor(&[a.clone()]);
  assert_eq!(res, b);
  // fixing a to 0 kills the product.
  let res = h.cofactor(&[!&a]);
  assert!(res.is_zero()); }

#[test] fn test_copy_across_managers() {
  let mgr1 = AigMgr::new();
  let a = mgr1.make_input();
  let b = mgr1.make_input();
  let h = mgr1.xor(&a, &b);
  let mgr2 = AigMgr::new();
  let h2 = mgr2.copy(&h);
  assert_eq!(mgr2.input_count(), 2);
  for m in 0..4u64 {
    let vals: Vec<AigBitVect> = (0..2).map(|i| if (m >> i) & 1 != 0 { !0 } else { 0 }).collect();
    assert_eq!(h.eval(&vals) & 1, h2.eval(&vals) & 1, "minterm {}", m); }}

#[test] fn test_rewrite_preserves_function() {
  let mgr = AigMgr::new();
  let a = mgr.make_input();
  let b = mgr.make_input();
  let c = mgr.make_input();
  let d = mgr.make_input();
  // a mux written wastefully: (a&b&c) | (a&b&~c) | (~a&d) == (a&b) | (~a&d)
  let t1 = mgr.and_many(&[a.clone(), b.clone(), c.clone()]);
  let t2 = mgr.and_many(&[a.clone(), b.clone(), !&c]);
  let t3 = mgr.and(&!&a, &d);
  let f = mgr.or_many(&[t1, t2, t3]);
  let seeds = [0xaaaa_u64, 0xcccc, 0xf0f0, 0xff00];
  let before = f.eval(&seeds);
  let before_size = mgr.and_count();
  mgr.rewrite();
  assert_eq!(f.eval(&seeds), before, "rewrite must preserve every handle's function");
  assert!(mgr.and_count() <= before_size, "rewrite never grows the graph"); }

#[test] fn test_rewrite_rebinds_handles() {
  let mgr = AigMgr::new();
  let a = mgr.make_input();
  let b = mgr.make_input();
  let c = mgr.make_input();
  let d = mgr.make_input();
  // (a b c d) | (a b c ~d) == a b c, spelled with six and nodes.
  let t1 = mgr.and_many(&[a.clone(), b.clone(), c.clone(), d.clone()]);
  let t2 = mgr.and_many(&[a.clone(), b.clone(), c.clone(), !&d]);
  let f = mgr.or(&t1, &t2);
  drop(t1);
  drop(t2);
  assert_eq!(mgr.and_count(), 6);
  mgr.rewrite();
  let seeds = [0xaaaa_u64, 0xcccc, 0xf0f0, 0xff00];
  let want = mgr.and_many(&[a.clone(), b.clone(), c.clone()]).eval(&seeds);
  assert_eq!(f.eval(&seeds), want, "the rebound handle keeps its function");
  assert!(mgr.and_count() < 6, "the redundant cone should shrink"); }

#[test] fn test_eval_list_and_size() {
  let mgr = AigMgr::new();
  let a = mgr.make_input();
  let b = mgr.make_input();
  let f = mgr.and(&a, &b);
  let g = mgr.or(&a, &b);
  let vals = mgr.eval(&[0b0011, 0b0101], &[f.clone(), g.clone()]);
  assert_eq!(vals[0] & 0xf, 0b0001);
  assert_eq!(vals[1] & 0xf, 0b0111);
  assert_eq!(f.size(), 3, "two inputs and one and");
  assert_eq!(g.size(), 3); }

#[test] fn test_ordering_and_hash() {
  let mgr = AigMgr::new();
  let a = mgr.make_input();
  let b = mgr.make_input();
  assert!(a < b);
  assert!(a < !&b);
  assert_ne!(a.hash(), b.hash()); }

#[test] fn test_print_and_dot() {
  let mgr = AigMgr::new();
  let a = mgr.make_input();
  let b = mgr.make_input();
  let f = mgr.and(&a, &!&b);
  let mut s = String::new();
  mgr.print(&mut s).unwrap();
  assert!(s.contains("# of inputs:  2"), "{}", s);
  assert!(s.contains("And("), "{}", s);
  let mut d = String::new();
  f.gen_dot(&mut d, &json::JsonValue::Null).unwrap();
  assert!(d.starts_with("digraph aig {"), "{}", d);
  assert!(d.contains("node2"), "{}", d); }

#[test] fn test_sweep_renumbers_contiguously() {
  let mgr = AigMgr::new();
  let a = mgr.make_input();
  let b = mgr.make_input();
  let c = mgr.make_input();
  let t = mgr.and(&a, &b);       // dies with the drop below
  let keep = mgr.and(&b, &c);
  let top = mgr.and(&t, &keep);
  drop(t);
  drop(top);
  mgr.sweep();
  assert_eq!(mgr.node_count(), 4, "three inputs and the kept and");
  // the kept handle still works after renumbering.
  assert_eq!(keep.eval(&[0, !0, !0]) & 1, 1);
  assert!(keep.index() < 10); }

#[cfg(feature = "slowtests")]
#[test] fn test_rewrite_random_functions() {
  // rewrite a pile of 4-input functions and check none changes.
  let mgr = AigMgr::new();
  let inputs: Vec<AigHandle> = (0..4).map(|_| mgr.make_input()).collect();
  let mut handles = vec![];
  let mut x: u32 = 0x12345678;
  for _ in 0..24 {
    // xorshift
    x ^= x << 13; x ^= x >> 17; x ^= x << 5;
    let mut h = if x & 1 == 0 { inputs[0].clone() } else { !&inputs[0] };
    for (i, inp) in inputs.iter().enumerate().skip(1) {
      let rhs = if (x >> i) & 1 == 0 { inp.clone() } else { !inp };
      h = match (x >> (i * 3)) & 3 {
        0 => mgr.and(&h, &rhs),
        1 => mgr.or(&h, &rhs),
        _ => mgr.xor(&h, &rhs) }}
    handles.push(h); }
  let seeds = [0xaaaa_u64, 0xcccc, 0xf0f0, 0xff00];
  let before: Vec<u64> = handles.iter().map(|h| h.eval(&seeds) & 0xffff).collect();
  mgr.rewrite();
  let after: Vec<u64> = handles.iter().map(|h| h.eval(&seeds) & 0xffff).collect();
  assert_eq!(before, after); }
