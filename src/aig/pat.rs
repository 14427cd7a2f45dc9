//! The rewrite pattern library.
//!
//! Candidate replacement structures are AND/XOR DAGs over four inputs,
//! indexed by the NPN representative of their truth table. Node 0 is the
//! constant 0 and nodes 1..=4 are the inputs; everything above is an AND
//! or XOR over earlier nodes. Pattern lists are kept in increasing
//! node-count order so cheaper structures are tried first.
use fxhash::{FxHashMap, FxHashSet};
use super::npn::{Npn4, Tv4, INPUT_TV};

/// patterns larger than this are never kept.
const MAX_PAT_SIZE: u8 = 7;
/// alternative structures kept per truth table.
const MAX_PER_TV: usize = 2;
/// hard cap on the node arena.
const MAX_NODES: usize = 1200;
/// enumeration rounds. Three rounds reach every structure the size cap
/// admits.
const ROUNDS: usize = 3;

/// One node of a pattern DAG.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PatNode {
  pub tv: Tv4,
  pub size: u8,
  pub level: u8,
  pub xor_flag: bool,
  pub child0: u32,
  pub inv0: bool,
  pub child1: u32,
  pub inv1: bool,
}

impl PatNode {
  pub fn is_xor(&self)->bool { self.xor_flag }}

/// A pattern pick: a root node plus the NPN transform that maps the
/// pattern's own function onto the target function.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PatGraph {
  pub root: u32,
  pub npn: Npn4,
}

/// The pattern library: NPN representative -> pattern list.
pub(crate) struct PatMgr {
  nodes: Vec<PatNode>,
  /// representative tv -> (root id, transform pat_tv -> rep).
  pats: FxHashMap<Tv4, Vec<(u32, Npn4)>>,
}

impl PatMgr {
  pub fn new()->PatMgr {
    let mut mgr = PatMgr { nodes: vec![], pats: FxHashMap::default() };
    mgr.build();
    mgr }

  pub fn node(&self, id: u32)->&PatNode { &self.nodes[id as usize] }

  /// patterns matching `tv`, with each transform adjusted so that
  /// `npn.xform(pattern tv) == tv`.
  pub fn get_pat(&self, tv: Tv4)->Vec<PatGraph> {
    let (rep, t) = Npn4::normalize(tv);
    let t_inv = t.inverse();
    match self.pats.get(&rep) {
      None => vec![],
      Some(list) => list.iter()
        .map(|&(root, to_rep)| PatGraph { root, npn: t_inv.compose(to_rep) })
        .collect() }}

  // -- library construction --

  fn build(&mut self) {
    // best structure size seen per truth table.
    let mut best: Vec<u8> = vec![u8::MAX; 1 << 16];
    // node 0: constant 0.
    self.push(PatNode { tv: 0x0000, size: 0, level: 0, xor_flag: false,
                        child0: 0, inv0: false, child1: 0, inv1: false }, &mut best);
    // nodes 1..=4: the inputs.
    for &tv in INPUT_TV.iter() {
      self.push(PatNode { tv, size: 0, level: 0, xor_flag: false,
                          child0: 0, inv0: false, child1: 0, inv1: false }, &mut best); }
    // each round combines every node with the nodes of the newest
    // frontier, so no pair is visited twice across rounds.
    let mut frontier = 1usize;
    for _ in 0..ROUNDS {
      let n = self.nodes.len();
      if frontier == n { break }
      'round: for j in frontier..n {
        for i in 1..j {
          for &(xor_flag, inv0, inv1) in &[
            (false, false, false), (false, true, false),
            (false, false, true), (false, true, true),
            (true, false, false),
          ] {
            if self.nodes.len() >= MAX_NODES { break 'round }
            self.try_add(i as u32, inv0, j as u32, inv1, xor_flag, &mut best); }}}
      frontier = n; }
    let classes = self.pats.len();
    trace!("pattern library: {} nodes, {} classes", self.nodes.len(), classes); }

  fn push(&mut self, node: PatNode, best: &mut [u8]) {
    let id = self.nodes.len() as u32;
    let tv = node.tv;
    let size = node.size;
    self.nodes.push(node);
    if size < best[tv as usize] { best[tv as usize] = size; }
    let (rep, t) = Npn4::normalize(tv);
    let list = self.pats.entry(rep).or_default();
    // keep the list in increasing node-count order.
    let pos = list.iter().position(|&(r, _)| self.nodes[r as usize].size > size)
      .unwrap_or(list.len());
    list.insert(pos, (id, t)); }

  fn try_add(&mut self, c0: u32, inv0: bool, c1: u32, inv1: bool, xor_flag: bool,
             best: &mut [u8]) {
    let n0 = self.nodes[c0 as usize];
    let n1 = self.nodes[c1 as usize];
    // cheap lower bound before the dfs below.
    if n0.size.max(n1.size) + 1 > MAX_PAT_SIZE { return }
    let tv = if xor_flag { n0.tv ^ n1.tv }
             else {
               let tv0 = if inv0 { !n0.tv } else { n0.tv };
               let tv1 = if inv1 { !n1.tv } else { n1.tv };
               tv0 & tv1 };
    // degenerate results never earn their nodes.
    if tv == 0x0000 || tv == 0xffff { return }
    if n0.size.max(n1.size) + 1 > best[tv as usize] { return }
    let size = self.merged_size(c0, c1);
    if size > MAX_PAT_SIZE { return }
    let cur = best[tv as usize];
    if size > cur { return }
    if size == cur {
      let (rep, _) = Npn4::normalize(tv);
      let same_tv = self.pats.get(&rep).map_or(0, |list| {
        list.iter().filter(|&&(r, _)| self.nodes[r as usize].tv == tv).count() });
      if same_tv >= MAX_PER_TV { return }}
    let level = n0.level.max(n1.level) + 1;
    self.push(PatNode { tv, size, level, xor_flag, child0: c0, inv0, child1: c1, inv1 },
              best); }

  /// node count of the DAG rooted at a fresh (c0, c1) combination,
  /// counting shared children once.
  fn merged_size(&self, c0: u32, c1: u32)->u8 {
    let mut mark: FxHashSet<u32> = FxHashSet::default();
    let mut count = 1u8;
    count = count.saturating_add(self.count_dfs(c0, &mut mark));
    count = count.saturating_add(self.count_dfs(c1, &mut mark));
    count }

  fn count_dfs(&self, id: u32, mark: &mut FxHashSet<u32>)->u8 {
    if id <= 4 || !mark.insert(id) { return 0 }
    let node = &self.nodes[id as usize];
    let mut count = 1u8;
    count = count.saturating_add(self.count_dfs(node.child0, mark));
    count = count.saturating_add(self.count_dfs(node.child1, mark));
    count }

  /// evaluate a pattern root over the input seeds (test aid).
  #[cfg(test)]
  fn eval(&self, id: u32)->Tv4 {
    if id == 0 { return 0x0000 }
    if id <= 4 { return INPUT_TV[id as usize - 1] }
    let node = &self.nodes[id as usize];
    let tv0 = self.eval(node.child0);
    let tv1 = self.eval(node.child1);
    if node.xor_flag { tv0 ^ tv1 }
    else {
      (if node.inv0 { !tv0 } else { tv0 }) & (if node.inv1 { !tv1 } else { tv1 }) }}}


#[test] fn test_pat_tvs_consistent() {
  let mgr = PatMgr::new();
  for (id, node) in mgr.nodes.iter().enumerate().skip(5) {
    assert_eq!(node.tv, mgr.eval(id as u32), "pattern node {} tv mismatch", id); }}

#[test] fn test_get_pat_matches() {
  let mgr = PatMgr::new();
  // the transform returned with each pattern must map its tv to the query.
  for &tv in &[0x8888u16, 0x7777, 0x6666, 0x0660, 0x8000, 0xfffe] {
    let pats = mgr.get_pat(tv);
    assert!(!pats.is_empty(), "no pattern for {:04x}", tv);
    for pat in pats {
      let pat_tv = mgr.node(pat.root).tv;
      assert_eq!(pat.npn.xform(pat_tv), tv,
                 "pattern {:04x} via {:?} should give {:04x}", pat_tv, pat.npn, tv); }}}

#[test] fn test_pat_sizes_increasing() {
  let mgr = PatMgr::new();
  for list in mgr.pats.values() {
    let sizes: Vec<u8> = list.iter().map(|&(r, _)| mgr.nodes[r as usize].size).collect();
    assert!(sizes.windows(2).all(|w| w[0] <= w[1]), "sizes not sorted: {:?}", sizes); }}

#[cfg(feature = "slowtests")]
#[test] fn test_pat_class_coverage() {
  // the bounded enumeration reaches the bulk of the 222 npn classes.
  let mgr = PatMgr::new();
  let mut reps = FxHashSet::default();
  for tv in 0..=0xffffu16 { reps.insert(Npn4::normalize(tv).0); }
  assert_eq!(reps.len(), 222);
  assert!(mgr.pats.len() * 10 >= reps.len() * 6,
          "expected at least 60% class coverage, got {}/222", mgr.pats.len()); }
