//! Cut-based local rewriting.
//!
//! One pass walks the referenced AND nodes in input-to-output order. For
//! each node it enumerates the 4-feasible cuts, evaluates each cut's
//! 4-input function, and asks the pattern library for cheaper structures
//! of the same NPN class. A replacement wins when the nodes it frees
//! (the cut's MFFC) outnumber the nodes it adds (existing structures via
//! the structural hash cost nothing). Winners go into a replace
//! dictionary; consumers pick them up later in the same pass because the
//! walk is topological, and external handles are rebound at pass end,
//! right before the sweep. Passes repeat until none of them wins.
use fxhash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use super::npn::{Npn4, Tv4, INPUT_TV};
use super::pat::{PatGraph, PatMgr};
use super::{AigBase, AigEdge, AigEvent, AigNodeKind};

// -- cuts ----------------------------------------------------------------

/// A cut: the leaves (every input-to-root path crosses them) and the
/// internal nodes between the leaves and the root.
#[derive(Clone, Debug)]
pub(crate) struct Cut {
  pub root: u32,
  pub leaves: SmallVec<[u32; 4]>,
  pub nodes: Vec<u32>,
}

impl Cut {
  /// the unit cut: the node is its own single leaf.
  fn unit(node: u32)->Cut {
    Cut { root: node, leaves: SmallVec::from_slice(&[node]), nodes: vec![] }}

  pub fn leaf_size(&self)->usize { self.leaves.len() }

  /// the cut function as a 16-bit truth table, by substituting the leaf
  /// seed patterns and conjoining through the internal nodes.
  pub fn calc_tv(&self, base: &AigBase)->Tv4 {
    assert!(self.leaf_size() == 4, "invalid argument: calc_tv needs a 4-leaf cut");
    let mut dict: FxHashMap<u32, Tv4> = FxHashMap::default();
    for (i, &leaf) in self.leaves.iter().enumerate() {
      dict.insert(leaf, INPUT_TV[i]); }
    Self::calc_dfs(base, self.root, &mut dict) }

  fn calc_dfs(base: &AigBase, id: u32, dict: &mut FxHashMap<u32, Tv4>)->Tv4 {
    if let Some(&tv) = dict.get(&id) { return tv }
    let (f0, f1) = match base.nodes[id as usize].kind {
      AigNodeKind::And(f0, f1) => (f0, f1),
      _ => panic!("logic error: cut interior reached an input") };
    let mut tv0 = Self::calc_dfs(base, f0.node(), dict);
    if f0.inv() { tv0 = !tv0; }
    let mut tv1 = Self::calc_dfs(base, f1.node(), dict);
    if f1.inv() { tv1 = !tv1; }
    let tv = tv0 & tv1;
    dict.insert(id, tv);
    tv }}

/// Bottom-up cut enumeration with per-node caching. Cached cuts are
/// dropped when the manager reports a structural change on their node.
pub(crate) struct CutMgr {
  cut_size: usize,
  cuts: FxHashMap<u32, Vec<Cut>>,
  /// per node: every id appearing in any of its cuts (leaves + interior).
  footprints: FxHashMap<u32, Vec<u32>>,
}

impl CutMgr {
  pub fn new(cut_size: usize)->CutMgr {
    CutMgr { cut_size, cuts: FxHashMap::default(), footprints: FxHashMap::default() }}

  pub fn on_event(&mut self, ev: AigEvent) {
    match ev {
      AigEvent::FaninChanged(id) | AigEvent::NodeDeleted(id) => {
        self.cuts.remove(&id);
        self.footprints.remove(&id); }}}

  pub fn enum_cuts(&mut self, base: &AigBase, id: u32)->&[Cut] {
    self.ensure(base, id);
    &self.cuts[&id] }

  fn ensure(&mut self, base: &AigBase, id: u32) {
    if self.cuts.contains_key(&id) { return }
    let mut cut_list = vec![Cut::unit(id)];
    if let AigNodeKind::And(f0, f1) = base.nodes[id as usize].kind {
      let (n0, n1) = (f0.node(), f1.node());
      self.ensure(base, n0);
      self.ensure(base, n1);
      let fp_mark = self.merge_footprint(n0, n1);
      let cuts0 = &self.cuts[&n0];
      let cuts1 = &self.cuts[&n1];
      for cut0 in cuts0 {
        for cut1 in cuts1 {
          if let Some(cut) = self.merge_cuts(base, id, cut0, cut1, &fp_mark) {
            cut_list.push(cut); }}}}
    let fp = Self::make_footprint(&cut_list);
    self.cuts.insert(id, cut_list);
    self.footprints.insert(id, fp); }

  fn make_footprint(cut_list: &[Cut])->Vec<u32> {
    let mut fp_hash = FxHashSet::default();
    let mut fp_list = vec![];
    for cut in cut_list {
      for &id in cut.leaves.iter().chain(cut.nodes.iter()) {
        if fp_hash.insert(id) { fp_list.push(id); }}}
    fp_list }

  fn merge_footprint(&self, n0: u32, n1: u32)->FxHashSet<u32> {
    let mut mark = FxHashSet::default();
    for &id in &self.footprints[&n0] { mark.insert(id); }
    for &id in &self.footprints[&n1] { mark.insert(id); }
    mark }

  /// merge two fanin cuts under a root. None when the merge is not a
  /// valid cut: a leaf inside the other side's interior, too many
  /// leaves, or a leaf reachable below another leaf within the
  /// footprint region (the structural containment rule).
  fn merge_cuts(&self, base: &AigBase, root: u32, cut0: &Cut, cut1: &Cut,
                fp_mark: &FxHashSet<u32>)->Option<Cut> {
    let set0: FxHashSet<u32> = cut0.nodes.iter().copied().collect();
    let set1: FxHashSet<u32> = cut1.nodes.iter().copied().collect();

    let mut nodes: Vec<u32> = cut0.nodes.clone();
    for &id in &cut1.nodes {
      if !set0.contains(&id) { nodes.push(id); }}

    let mut leaves: SmallVec<[u32; 4]> = SmallVec::new();
    for &leaf in &cut0.leaves {
      if set1.contains(&leaf) { return None }
      leaves.push(leaf); }
    for &leaf in &cut1.leaves {
      if set0.contains(&leaf) { return None }
      if !leaves.contains(&leaf) { leaves.push(leaf); }}
    if leaves.len() > self.cut_size { return None }
    nodes.push(root);

    if !Self::check_leaf_list(base, &leaves, fp_mark) { return None }
    Some(Cut { root, leaves, nodes }) }

  fn check_leaf_list(base: &AigBase, leaves: &[u32], fp_mark: &FxHashSet<u32>)->bool {
    let leaf_mark: FxHashSet<u32> = leaves.iter().copied().collect();
    let mut mark = FxHashSet::default();
    leaves.iter().all(|&leaf| Self::check_dfs(base, leaf, fp_mark, &leaf_mark, &mut mark)) }

  fn check_dfs(base: &AigBase, id: u32, fp_mark: &FxHashSet<u32>,
               leaf_mark: &FxHashSet<u32>, mark: &mut FxHashSet<u32>)->bool {
    if !fp_mark.contains(&id) { return true }
    if !mark.insert(id) { return true }
    if let AigNodeKind::And(f0, f1) = base.nodes[id as usize].kind {
      for child in [f0.node(), f1.node()] {
        if leaf_mark.contains(&child) { return false }
        if !Self::check_dfs(base, child, fp_mark, leaf_mark, mark) { return false }}}
    true }}

// -- merit ---------------------------------------------------------------

/// Marks the nodes a replacement would free: the MFFC of the cut, with
/// the function's true support leaves pinned so they never count as
/// freed. A leaf that the normalized function does not depend on may
/// itself be freed.
pub(crate) struct CalcMerit {
  count: FxHashMap<u32, i64>,
  delete_mark: FxHashSet<u32>,
}

impl CalcMerit {
  pub fn new(base: &AigBase, cut: &Cut, tv: Tv4)->CalcMerit {
    let mut calc = CalcMerit { count: FxHashMap::default(), delete_mark: FxHashSet::default() };
    if !base.nodes[cut.root as usize].is_and() { return calc }
    let sup = Npn4::support(tv);
    for (i, &leaf) in cut.leaves.iter().enumerate() {
      if sup & (1 << i) != 0 { calc.count.insert(leaf, -1); }}
    calc.delete_node(base, cut.root);
    calc }

  pub fn merit(&self)->i64 { self.delete_mark.len() as i64 }

  pub fn check(&self, id: u32)->bool { self.delete_mark.contains(&id) }

  fn delete_node(&mut self, base: &AigBase, id: u32) {
    self.delete_mark.insert(id);
    if let AigNodeKind::And(f0, f1) = base.nodes[id as usize].kind {
      self.calc_sub(base, f0.node());
      self.calc_sub(base, f1.node()); }}

  fn calc_sub(&mut self, base: &AigBase, id: u32) {
    let count = self.count.entry(id).or_insert(0);
    *count += 1;
    if *count == base.nodes[id as usize].refs as i64 && base.nodes[id as usize].is_and() {
      self.delete_node(base, id); }}}

// -- pattern materialization ---------------------------------------------

/// the edge value standing for "this pattern node does not exist yet".
const UNKNOWN: AigEdge = AigEdge::zero();

/// Maps a pattern DAG onto the AIG: either counting the AND nodes it
/// would add (existing nodes found through the structural hash are free)
/// or actually materializing it.
pub(crate) struct Pat2Aig<'a> {
  pats: &'a PatMgr,
  dict: FxHashMap<u32, AigEdge>,
  count: i64,
}

impl<'a> Pat2Aig<'a> {
  pub fn new(pats: &'a PatMgr)->Self {
    Pat2Aig { pats, dict: FxHashMap::default(), count: 0 }}

  fn bind_leaves(&mut self, cut: &Cut, npn: Npn4) {
    self.dict.clear();
    for i in 0..4 {
      let ipos = npn.iperm(i);
      if ipos < cut.leaf_size() {
        let leaf = cut.leaves[ipos];
        self.dict.insert(i as u32 + 1, AigEdge::new(leaf, npn.iinv(i))); }}}

  /// number of AND nodes the pattern would introduce.
  pub fn calc_cost(&mut self, base: &AigBase, cut: &Cut, pat: &PatGraph,
                   merit: &CalcMerit)->i64 {
    if pat.root <= 4 { return 0 }  // constant or bare input
    self.bind_leaves(cut, pat.npn);
    self.count = 0;
    self.cost_sub(base, pat.root, merit);
    self.count }

  fn cost_sub(&mut self, base: &AigBase, id: u32, merit: &CalcMerit)->AigEdge {
    if let Some(&e) = self.dict.get(&id) { return e }
    if id == 0 { panic!("logic error: constant node inside a pattern graph") }
    if id <= 4 { return UNKNOWN }  // unbound leaf: function does not use it
    let node = *self.pats.node(id);
    let e0 = self.cost_sub(base, node.child0, merit).inv_if(node.inv0);
    let e1 = self.cost_sub(base, node.child1, merit).inv_if(node.inv1);
    if node.is_xor() {
      // expands to or(and(a,~b), and(~a,b)) at materialization time
      self.count += 3;
      self.dict.insert(id, UNKNOWN);
      return UNKNOWN }
    if !e0.is_const() && !e1.is_const() {
      if let Some(found) = base.find_and(e0, e1) {
        // an existing node is free, unless it is about to be deleted.
        if !merit.check(found) && base.nodes[found as usize].refs > 0 {
          let e = AigEdge::new(found, false);
          self.dict.insert(id, e);
          return e }}}
    self.count += 1;
    self.dict.insert(id, UNKNOWN);
    UNKNOWN }

  /// materialize the pattern and return its root edge.
  pub fn new_aig(&mut self, base: &mut AigBase, cut: &Cut, pat: &PatGraph)->AigEdge {
    let mut edge = if pat.root == 0 { AigEdge::zero() }
    else {
      self.bind_leaves(cut, pat.npn);
      self.aig_sub(base, pat.root) };
    if pat.npn.oinv() { edge = !edge; }
    edge }

  fn aig_sub(&mut self, base: &mut AigBase, id: u32)->AigEdge {
    if let Some(&e) = self.dict.get(&id) { return e }
    let node = *self.pats.node(id);
    let e0 = self.aig_sub(base, node.child0).inv_if(node.inv0);
    let e1 = self.aig_sub(base, node.child1).inv_if(node.inv1);
    let e = if node.is_xor() { base.xor_op(e0, e1) } else { base.and_op(e0, e1) };
    self.dict.insert(id, e);
    e }}

// -- replacement bookkeeping ---------------------------------------------

/// Replacement results, keyed on the node so an inverted query edge gets
/// an inverted answer.
#[derive(Default)]
pub(crate) struct ReplaceDict { dict: FxHashMap<u32, AigEdge> }

impl ReplaceDict {
  pub fn new()->ReplaceDict { ReplaceDict::default() }

  pub fn add(&mut self, node: u32, new_edge: AigEdge) {
    self.dict.insert(node, new_edge); }

  /// the replacement for `edge`, or `edge` itself when none is recorded.
  pub fn get(&self, edge: AigEdge)->AigEdge {
    if edge.is_const() { return edge }
    match self.dict.get(&edge.node()) {
      Some(&e) => e.inv_if(edge.inv()),
      None => edge }}}

fn lock_dfs(base: &AigBase, edge: AigEdge, lock: &mut FxHashSet<u32>) {
  if edge.is_const() { return }
  let id = edge.node();
  if !lock.insert(id) { return }
  if let AigNodeKind::And(f0, f1) = base.nodes[id as usize].kind {
    lock_dfs(base, f0, lock);
    lock_dfs(base, f1, lock); }}

// -- the pass driver -----------------------------------------------------

impl AigBase {
  /// local rewriting: repeat rewrite passes until one finds no
  /// profitable replacement, sweeping after each changed pass.
  pub(crate) fn rewrite(&mut self) {
    let pats = PatMgr::new();
    loop {
      let changed = self.rewrite_pass(&pats);
      if !changed { break }}}

  fn rewrite_pass(&mut self, pats: &PatMgr)->bool {
    let mut cut_mgr = CutMgr::new(4);
    let mut replace = ReplaceDict::new();
    // locked nodes (reached by a freshly installed subgraph) keep their
    // shape until the pass ends.
    let mut lock: FxHashSet<u32> = FxHashSet::default();
    let mut changed = false;
    self.record_events();
    let node_list = self.and_list();
    for id in node_list {
      for ev in self.drain_events() { cut_mgr.on_event(ev); }
      if lock.contains(&id) { continue }
      if self.nodes[id as usize].refs == 0 { continue }  // died earlier this pass
      let (old0, old1) = match self.nodes[id as usize].kind {
        AigNodeKind::And(f0, f1) => (f0, f1),
        _ => continue };
      // pull this node onto the rewritten fanins first.
      let f0 = replace.get(old0);
      let f1 = replace.get(old1);
      if let Some(e) = Self::special_case(f0, f1) {
        replace.add(id, e);
        continue }
      if (f0, f1) != (old0, old1) {
        if let Some(other) = self.find_and(f0, f1) {
          if other != id {
            // the rewritten fanins already exist as another node.
            replace.add(id, AigEdge::new(other, false));
            continue }}
        self.change_fanin(id, f0, f1);
        for ev in self.drain_events() { cut_mgr.on_event(ev); }}

      let cut_list: Vec<Cut> = cut_mgr.enum_cuts(self, id).to_vec();
      let mut max_gain: i64 = 0;
      let mut winner: Option<(Cut, PatGraph)> = None;
      for cut in cut_list {
        if cut.leaf_size() != 4 { continue }
        let tv = cut.calc_tv(self);
        let merit_calc = CalcMerit::new(self, &cut, tv);
        let merit = merit_calc.merit();
        if merit <= max_gain { continue }  // cost is never negative
        for pat in pats.get_pat(tv) {
          let cost = Pat2Aig::new(pats).calc_cost(self, &cut, &pat, &merit_calc);
          let gain = merit - cost;
          if gain > max_gain {
            max_gain = gain;
            winner = Some((cut.clone(), pat)); }}}
      if let Some((cut, pat)) = winner {
        changed = true;
        let new_edge = Pat2Aig::new(pats).new_aig(self, &cut, &pat);
        trace!("rewrite: Node#{} -> {} (gain {})", id, new_edge, max_gain);
        replace.add(id, new_edge);
        lock_dfs(self, new_edge, &mut lock); }}
    self.stop_events();
    if changed {
      self.rebind_handles(&replace);
      self.sweep();
      debug!("rewrite pass done: {} ands left", self.and_num()); }
    changed }}
