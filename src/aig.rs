//! And-inverter graphs.
//!
//! The manager owns an arena of nodes (inputs and two-input ANDs) shared
//! through a structural-hash table, so one node exists per distinct
//! canonical `(fanin0, fanin1)` pair. Edges carry the inverter in the low
//! bit of a single packed word. Clients only ever hold [`AigHandle`]s; a
//! handle pins its subgraph via reference counts and registers itself with
//! the manager so that [`AigMgr::rewrite`] can rebind it and
//! [`AigMgr::sweep`] can renumber it in place.
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use fxhash::{FxHashMap, FxHashSet};
use json::JsonValue;
use crate::dot::{DotOpts, DotWriter};
use crate::err::Result;
use crate::expr::Expr;
use crate::lit::Lit;
use crate::sop::{SopCover, SopCube};

pub mod npn;
mod pat;
mod rwt;

/// Bit-parallel simulation value: one simulation pattern per bit.
pub type AigBitVect = u64;


// -- edges ---------------------------------------------------------------

/// An edge: a node id plus an output-inversion flag, packed into one word
/// as `(id + 1) << 1 | inv`. The two constants are the null node:
/// `0` is the zero-edge and `1` the one-edge. This is the argument and
/// return type of every AIG operation.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AigEdge { packed: u64 }

impl AigEdge {
  pub const fn zero()->AigEdge { AigEdge { packed: 0 }}
  pub const fn one()->AigEdge { AigEdge { packed: 1 }}
  pub(crate) fn new(node: u32, inv: bool)->AigEdge {
    AigEdge { packed: ((node as u64 + 1) << 1) | (inv as u64) }}
  pub(crate) fn from_packed(packed: u64)->AigEdge { AigEdge { packed }}

  #[inline] pub fn is_zero(self)->bool { self.packed == 0 }
  #[inline] pub fn is_one(self)->bool { self.packed == 1 }
  #[inline] pub fn is_const(self)->bool { self.packed & !1 == 0 }
  #[inline] pub fn inv(self)->bool { self.packed & 1 != 0 }

  /// the node id. Only valid when `!is_const()`.
  #[inline] pub(crate) fn node(self)->u32 { (self.packed >> 1) as u32 - 1 }

  /// a unique index: `(id + 1) * 2 + inv` for nodes, `0/1` for constants.
  #[inline] pub fn index(self)->u64 { self.packed }
  #[inline] pub(crate) fn packed(self)->u64 { self.packed }

  /// the same edge with the inverter cleared.
  #[inline] pub fn positive_edge(self)->AigEdge { AigEdge { packed: self.packed & !1 }}
  /// the same edge with the inverter set.
  #[inline] pub fn negative_edge(self)->AigEdge { AigEdge { packed: self.packed | 1 }}
  /// invert when `inv` is true.
  #[inline] pub fn inv_if(self, inv: bool)->AigEdge { AigEdge { packed: self.packed ^ inv as u64 }}}

impl std::ops::Not for AigEdge {
  type Output = AigEdge;
  fn not(self)->AigEdge { AigEdge { packed: self.packed ^ 1 }}}

impl fmt::Display for AigEdge {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    if self.is_zero() { write!(f, "--0--") }
    else if self.is_one() { write!(f, "--1--") }
    else { write!(f, "{}Node#{}", if self.inv() { "~" } else { "" }, self.node()) }}}

impl fmt::Debug for AigEdge {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self) }}


// -- nodes ---------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AigNodeKind {
  /// an input with its input index.
  Input(u32),
  /// a two-input AND.
  And(AigEdge, AigEdge),
}

/// One arena slot: a stable id, a reference count, and the node payload.
#[derive(Clone, Debug)]
pub(crate) struct AigNode {
  pub id: u32,
  pub refs: u32,
  pub kind: AigNodeKind,
}

impl AigNode {
  pub fn is_input(&self)->bool { matches!(self.kind, AigNodeKind::Input(_)) }
  pub fn is_and(&self)->bool { matches!(self.kind, AigNodeKind::And(..)) }

  pub fn input_id(&self)->u32 {
    match self.kind {
      AigNodeKind::Input(i) => i,
      _ => panic!("invalid argument: input_id() is valid if is_input() == true") }}

  pub fn fanin0(&self)->AigEdge {
    match self.kind {
      AigNodeKind::And(f0, _) => f0,
      _ => panic!("invalid argument: fanin0() is valid if is_and() == true") }}

  pub fn fanin1(&self)->AigEdge {
    match self.kind {
      AigNodeKind::And(_, f1) => f1,
      _ => panic!("invalid argument: fanin1() is valid if is_and() == true") }}}


// -- events (rewriting protocol) -----------------------------------------

/// Structural-change notifications recorded while a rewrite pass is
/// active; the cut manager drains them to invalidate cached cuts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AigEvent {
  FaninChanged(u32),
  NodeDeleted(u32),
}


// -- the manager body ----------------------------------------------------

pub(crate) struct AigBase {
  /// id-indexed node arena. Owns the nodes.
  pub(crate) nodes: Vec<AigNode>,
  /// input index -> node id. Inputs are never collected.
  pub(crate) inputs: Vec<u32>,
  /// structural hash: canonical (fanin0, fanin1) -> AND node id.
  and_table: FxHashMap<(u64, u64), u32>,
  /// registered handle slots, patched on rewrite and sweep.
  handles: Vec<Weak<Cell<u64>>>,
  /// event log, recording only while a rewrite pass is active.
  events: Option<Vec<AigEvent>>,
}

impl AigBase {
  pub fn new()->AigBase {
    AigBase { nodes: vec![], inputs: vec![], and_table: FxHashMap::default(),
              handles: vec![], events: None }}

  pub fn node_num(&self)->usize { self.nodes.len() }
  pub fn input_num(&self)->usize { self.inputs.len() }
  pub fn and_num(&self)->usize { self.nodes.len() - self.inputs.len() }

  pub fn node(&self, id: u32)->&AigNode { &self.nodes[id as usize] }

  /// the (always non-inverting) edge for input `input_id`.
  pub fn input(&self, input_id: usize)->AigEdge {
    if input_id >= self.inputs.len() {
      panic!("out of range: input index {} >= input_num {}", input_id, self.inputs.len()) }
    AigEdge::new(self.inputs[input_id], false) }

  pub fn make_input(&mut self)->AigEdge {
    let input_id = self.inputs.len() as u32;
    let id = self.nodes.len() as u32;
    self.nodes.push(AigNode { id, refs: 0, kind: AigNodeKind::Input(input_id) });
    self.inputs.push(id);
    AigEdge::new(id, false) }

  /// grow the input array so indices `0..n` are valid.
  fn reserve_inputs(&mut self, n: usize) {
    while self.inputs.len() < n { self.make_input(); }}

  // -- structural hashing --

  fn and_key(f0: AigEdge, f1: AigEdge)->(u64, u64) {
    // order-insensitive: canonicalize by index.
    if f0.index() <= f1.index() { (f0.packed, f1.packed) } else { (f1.packed, f0.packed) }}

  /// look up an existing AND node for the canonicalized pair.
  pub fn find_and(&self, f0: AigEdge, f1: AigEdge)->Option<u32> {
    self.and_table.get(&Self::and_key(f0, f1)).copied() }

  /// the trivial-case table. Some(edge) short-circuits the lookup.
  fn special_case(f0: AigEdge, f1: AigEdge)->Option<AigEdge> {
    if f0.is_zero() || f1.is_zero() { Some(AigEdge::zero()) }
    else if f0.is_one() { Some(f1) }
    else if f1.is_one() { Some(f0) }
    else if f0 == f1 { Some(f0) }
    else if f0 == !f1 { Some(AigEdge::zero()) }
    else { None }}

  pub fn and_op(&mut self, f0: AigEdge, f1: AigEdge)->AigEdge {
    if let Some(ans) = Self::special_case(f0, f1) { return ans }
    if let Some(id) = self.find_and(f0, f1) { return AigEdge::new(id, false) }
    let id = self.new_and(f0, f1);
    AigEdge::new(id, false) }

  pub fn or_op(&mut self, f0: AigEdge, f1: AigEdge)->AigEdge {
    // De Morgan
    !self.and_op(!f0, !f1) }

  pub fn xor_op(&mut self, f0: AigEdge, f1: AigEdge)->AigEdge {
    // ab' + a'b
    let h0 = self.and_op(f0, !f1);
    let h1 = self.and_op(!f0, f1);
    self.or_op(h0, h1) }

  fn new_and(&mut self, f0: AigEdge, f1: AigEdge)->u32 {
    let (k0, k1) = Self::and_key(f0, f1);
    let id = self.nodes.len() as u32;
    self.nodes.push(AigNode {
      id, refs: 0,
      kind: AigNodeKind::And(AigEdge::from_packed(k0), AigEdge::from_packed(k1)) });
    self.and_table.insert((k0, k1), id);
    id }

  // -- balanced many-input reductions --

  pub fn and_many(&mut self, fanins: &[AigEdge])->AigEdge { self.and_sub(fanins, 0, fanins.len()) }
  pub fn or_many(&mut self, fanins: &[AigEdge])->AigEdge { self.or_sub(fanins, 0, fanins.len()) }
  pub fn xor_many(&mut self, fanins: &[AigEdge])->AigEdge { self.xor_sub(fanins, 0, fanins.len()) }

  fn and_sub(&mut self, fanins: &[AigEdge], begin: usize, end: usize)->AigEdge {
    assert!(begin < end, "logic error: empty operand range");
    match end - begin {
      1 => fanins[begin],
      2 => self.and_op(fanins[begin], fanins[begin + 1]),
      _ => {
        let mid = (begin + end) / 2;
        let e0 = self.and_sub(fanins, begin, mid);
        let e1 = self.and_sub(fanins, mid, end);
        self.and_op(e0, e1) }}}

  fn or_sub(&mut self, fanins: &[AigEdge], begin: usize, end: usize)->AigEdge {
    assert!(begin < end, "logic error: empty operand range");
    match end - begin {
      1 => fanins[begin],
      2 => self.or_op(fanins[begin], fanins[begin + 1]),
      _ => {
        let mid = (begin + end) / 2;
        let e0 = self.or_sub(fanins, begin, mid);
        let e1 = self.or_sub(fanins, mid, end);
        self.or_op(e0, e1) }}}

  fn xor_sub(&mut self, fanins: &[AigEdge], begin: usize, end: usize)->AigEdge {
    assert!(begin < end, "logic error: empty operand range");
    match end - begin {
      1 => fanins[begin],
      2 => self.xor_op(fanins[begin], fanins[begin + 1]),
      _ => {
        let mid = (begin + end) / 2;
        let e0 = self.xor_sub(fanins, begin, mid);
        let e1 = self.xor_sub(fanins, mid, end);
        self.xor_op(e0, e1) }}}

  // -- lowering from other representations --

  pub fn from_expr(&mut self, expr: &Expr, input_list: &[AigEdge])->AigEdge {
    if expr.is_zero() { return AigEdge::zero() }
    if expr.is_one() { return AigEdge::one() }
    if let Some(lit) = expr.lit() {
      let var = lit.var() as usize;
      assert!(var < input_list.len(), "invalid argument: input_list is too small");
      return input_list[var].inv_if(lit.inv()) }
    let opr: Vec<AigEdge> = expr.operands().iter()
      .map(|x| self.from_expr(x, input_list)).collect();
    if expr.is_and() { self.and_many(&opr) }
    else if expr.is_or() { self.or_many(&opr) }
    else { self.xor_many(&opr) }}

  pub fn from_cube(&mut self, cube: &SopCube, input_list: &[AigEdge])->AigEdge {
    let lit_list = cube.literal_list();
    if lit_list.is_empty() { return AigEdge::one() }  // the universal cube
    let fanins: Vec<AigEdge> = lit_list.iter()
      .map(|lit| input_list[lit.var() as usize].inv_if(lit.inv())).collect();
    self.and_many(&fanins) }

  pub fn from_cover(&mut self, cover: &SopCover, input_list: &[AigEdge])->AigEdge {
    if cover.cube_num() == 0 { return AigEdge::zero() }  // the empty cover
    let terms: Vec<AigEdge> = (0..cover.cube_num())
      .map(|i| { let cube = cover.get_cube(i); self.from_cube(&cube, input_list) })
      .collect();
    self.or_many(&terms) }

  // -- cofactor --

  /// fix the value of every node in `cedge_list` (an inverted edge fixes
  /// its node to 0, a plain edge to 1) and rebuild `edge` bottom-up.
  pub fn cofactor(&mut self, cedge_list: &[AigEdge], edge: AigEdge)->AigEdge {
    let mut dict = Self::cofactor_init(cedge_list);
    self.cofactor_sub(edge, &mut dict) }

  pub fn cofactor_list(&mut self, cedge_list: &[AigEdge], edge_list: &[AigEdge])->Vec<AigEdge> {
    let mut dict = Self::cofactor_init(cedge_list);
    edge_list.iter().map(|&e| self.cofactor_sub(e, &mut dict)).collect() }

  fn cofactor_init(cedge_list: &[AigEdge])->FxHashMap<u32, AigEdge> {
    let mut dict = FxHashMap::default();
    for &edge in cedge_list {
      if edge.is_const() { continue }
      dict.insert(edge.node(), if edge.inv() { AigEdge::zero() } else { AigEdge::one() }); }
    dict }

  /// memo is keyed on the node; the queried edge's inverter is applied on
  /// the way out.
  fn cofactor_sub(&mut self, edge: AigEdge, dict: &mut FxHashMap<u32, AigEdge>)->AigEdge {
    if edge.is_const() { return edge }
    let id = edge.node();
    if let Some(&e) = dict.get(&id) { return e.inv_if(edge.inv()) }
    let new_edge = match self.nodes[id as usize].kind {
      AigNodeKind::Input(_) => AigEdge::new(id, false),
      AigNodeKind::And(f0, f1) => {
        let e0 = self.cofactor_sub(f0, dict);
        let e1 = self.cofactor_sub(f1, dict);
        self.and_op(e0, e1) }};
    dict.insert(id, new_edge);
    new_edge.inv_if(edge.inv()) }

  // -- simulation --

  pub fn eval(&self, input_vals: &[AigBitVect], output: AigEdge)->AigBitVect {
    let mut dict = FxHashMap::default();
    self.eval_node(input_vals, output, &mut dict) }

  pub fn eval_list(&self, input_vals: &[AigBitVect], outputs: &[AigEdge])->Vec<AigBitVect> {
    let mut dict = FxHashMap::default();
    outputs.iter().map(|&e| self.eval_node(input_vals, e, &mut dict)).collect() }

  fn eval_node(&self, input_vals: &[AigBitVect], edge: AigEdge,
               dict: &mut FxHashMap<u32, AigBitVect>)->AigBitVect {
    if edge.is_zero() { return 0 }
    if edge.is_one() { return !0 }
    let id = edge.node();
    let val = if let Some(&v) = dict.get(&id) { v }
    else {
      let v = match self.nodes[id as usize].kind {
        AigNodeKind::Input(i) => {
          assert!((i as usize) < input_vals.len(),
                  "logic error: input #{}'s value is not given", i);
          input_vals[i as usize] }
        AigNodeKind::And(f0, f1) => {
          let v0 = self.eval_node(input_vals, f0, dict);
          let v1 = self.eval_node(input_vals, f1, dict);
          v0 & v1 }};
      dict.insert(id, v);
      v };
    if edge.inv() { !val } else { val }}

  // -- structural queries --

  /// number of distinct nodes reachable from the given roots.
  pub fn size(&self, edge_list: &[AigEdge])->usize {
    let mut mark = FxHashSet::default();
    for &e in edge_list {
      if !e.is_const() { self.size_dfs(e.node(), &mut mark); }}
    mark.len() }

  fn size_dfs(&self, id: u32, mark: &mut FxHashSet<u32>) {
    if !mark.insert(id) { return }
    if let AigNodeKind::And(f0, f1) = self.nodes[id as usize].kind {
      self.size_dfs(f0.node(), mark);
      self.size_dfs(f1.node(), mark); }}

  /// the AND-group fanins: the leaves of the maximal tree of
  /// non-inverted AND edges rooted here, sorted by index, deduplicated.
  pub fn ex_fanin_list(&self, edge: AigEdge)->Vec<AigEdge> {
    assert!(self.edge_is_and(edge),
            "invalid argument: ex_fanin_list() is valid if is_and() == true");
    let node = &self.nodes[edge.node() as usize];
    let mut list = vec![];
    self.ex_fanin_sub(node.fanin0(), &mut list);
    self.ex_fanin_sub(node.fanin1(), &mut list);
    list.sort();
    list.dedup();
    list }

  fn ex_fanin_sub(&self, edge: AigEdge, list: &mut Vec<AigEdge>) {
    if !edge.inv() && self.edge_is_and(edge) {
      let node = &self.nodes[edge.node() as usize];
      self.ex_fanin_sub(node.fanin0(), list);
      self.ex_fanin_sub(node.fanin1(), list); }
    else { list.push(edge); }}

  pub fn edge_is_input(&self, edge: AigEdge)->bool {
    !edge.is_const() && self.nodes[edge.node() as usize].is_input() }

  pub fn edge_is_and(&self, edge: AigEdge)->bool {
    !edge.is_const() && self.nodes[edge.node() as usize].is_and() }

  /// AND node ids in input-to-output topological order, restricted to
  /// referenced nodes.
  pub fn and_list(&self)->Vec<u32> {
    let mut mark = FxHashSet::default();
    let mut list = vec![];
    for id in 0..self.nodes.len() as u32 {
      self.and_dfs(id, &mut mark, &mut list); }
    list }

  fn and_dfs(&self, id: u32, mark: &mut FxHashSet<u32>, list: &mut Vec<u32>) {
    let node = &self.nodes[id as usize];
    if node.is_input() || node.refs == 0 { return }
    if mark.contains(&id) { return }
    mark.insert(id);
    if let AigNodeKind::And(f0, f1) = node.kind {
      self.and_dfs(f0.node(), mark, list);
      self.and_dfs(f1.node(), mark, list); }
    list.push(id); }

  // -- reference counting --

  /// a node's count going 0->1 pins its fanins too.
  pub(crate) fn inc_node_ref(&mut self, id: u32) {
    let kind = self.nodes[id as usize].kind;
    if let AigNodeKind::And(f0, f1) = kind {
      self.nodes[id as usize].refs += 1;
      if self.nodes[id as usize].refs == 1 {
        self.inc_node_ref(f0.node());
        self.inc_node_ref(f1.node()); }}
    // inputs are never counted
  }

  /// a node's count hitting 0 deactivates it: it leaves the structural
  /// table at once and is physically removed at the next sweep().
  pub(crate) fn dec_node_ref(&mut self, id: u32) {
    let node = &self.nodes[id as usize];
    if node.is_input() { return }
    if node.refs == 0 { return }  // already deactivated
    self.nodes[id as usize].refs -= 1;
    if self.nodes[id as usize].refs == 0 { self.deactivate(id); }}

  fn deactivate(&mut self, id: u32) {
    self.erase_and_entry(id);
    if let AigNodeKind::And(f0, f1) = self.nodes[id as usize].kind {
      self.dec_node_ref(f0.node());
      self.dec_node_ref(f1.node()); }}

  /// drop the structural entry for `id`, but only if it still owns it.
  fn erase_and_entry(&mut self, id: u32) {
    if let AigNodeKind::And(f0, f1) = self.nodes[id as usize].kind {
      let key = Self::and_key(f0, f1);
      if self.and_table.get(&key) == Some(&id) { self.and_table.remove(&key); }}}

  /// redirect an AND node's fanins in place (rewriting only).
  pub(crate) fn change_fanin(&mut self, id: u32, f0: AigEdge, f1: AigEdge) {
    self.erase_and_entry(id);
    let (k0, k1) = Self::and_key(f0, f1);
    let (f0, f1) = (AigEdge::from_packed(k0), AigEdge::from_packed(k1));
    let (old0, old1) = match self.nodes[id as usize].kind {
      AigNodeKind::And(a, b) => (a, b),
      _ => panic!("logic error: change_fanin on a non-AND node") };
    let referenced = self.nodes[id as usize].refs > 0;
    if old0.node() != f0.node() && referenced {
      self.inc_node_ref(f0.node());
      self.dec_node_ref(old0.node()); }
    if old1.node() != f1.node() && referenced {
      self.inc_node_ref(f1.node());
      self.dec_node_ref(old1.node()); }
    self.nodes[id as usize].kind = AigNodeKind::And(f0, f1);
    self.and_table.insert((k0, k1), id);
    self.emit(AigEvent::FaninChanged(id)); }

  fn emit(&mut self, ev: AigEvent) {
    if let Some(events) = &mut self.events { events.push(ev); }}

  pub(crate) fn record_events(&mut self) { self.events = Some(vec![]); }
  pub(crate) fn stop_events(&mut self) { self.events = None; }
  pub(crate) fn drain_events(&mut self)->Vec<AigEvent> {
    match &mut self.events {
      Some(events) => std::mem::take(events),
      None => vec![] }}

  // -- sweep --

  /// remove every AND node with a zero reference count, renumber ids
  /// contiguously, and patch every registered handle. Inputs are kept.
  pub fn sweep(&mut self) {
    let old = std::mem::take(&mut self.nodes);
    let mut remap: Vec<u32> = vec![u32::MAX; old.len()];
    let mut kept: Vec<AigNode> = Vec::with_capacity(old.len());
    for node in old {
      if node.is_input() || node.refs > 0 {
        remap[node.id as usize] = kept.len() as u32;
        kept.push(node); }
      else {
        trace!("sweep: Node#{} is deleted", node.id);
        self.emit(AigEvent::NodeDeleted(node.id)); }}
    let removed = remap.len() - kept.len();
    let remap_edge = |e: AigEdge| {
      if e.is_const() { e } else { AigEdge::new(remap[e.node() as usize], e.inv()) }};
    for (new_id, node) in kept.iter_mut().enumerate() {
      node.id = new_id as u32;
      if let AigNodeKind::And(f0, f1) = node.kind {
        // renumbering may flip the canonical fanin order.
        let (k0, k1) = Self::and_key(remap_edge(f0), remap_edge(f1));
        node.kind = AigNodeKind::And(AigEdge::from_packed(k0), AigEdge::from_packed(k1)); }}
    self.nodes = kept;
    for input in self.inputs.iter_mut() { *input = remap[*input as usize]; }
    self.and_table.clear();
    for node in &self.nodes {
      if let AigNodeKind::And(f0, f1) = node.kind {
        self.and_table.insert((f0.packed, f1.packed), node.id); }}
    self.patch_handles(|e| remap_edge(e));
    if removed > 0 { debug!("sweep: removed {} nodes, {} left", removed, self.nodes.len()); }}

  // -- handle registry --

  pub(crate) fn add_handle(&mut self, slot: &Rc<Cell<u64>>) {
    self.handles.push(Rc::downgrade(slot)); }

  /// apply `f` to every live handle's edge, without touching refcounts
  /// (sweep renumbering). Dead weak slots are purged on the way.
  fn patch_handles(&mut self, f: impl Fn(AigEdge)->AigEdge) {
    self.handles.retain(|w| match w.upgrade() {
      Some(slot) => {
        let e = AigEdge::from_packed(slot.get());
        if !e.is_const() { slot.set(f(e).packed); }
        true }
      None => false }); }

  /// rebind every live handle through the replace dictionary, adjusting
  /// reference counts like any other fanout change (rewriting only).
  pub(crate) fn rebind_handles(&mut self, replace: &rwt::ReplaceDict) {
    let slots: Vec<Rc<Cell<u64>>> = self.handles.iter().filter_map(|w| w.upgrade()).collect();
    for slot in slots {
      let old = AigEdge::from_packed(slot.get());
      if old.is_const() { continue }
      let new = replace.get(old);
      if new != old {
        if !new.is_const() { self.inc_node_ref(new.node()); }
        self.dec_node_ref(old.node());
        slot.set(new.packed); }}
    self.handles.retain(|w| w.strong_count() > 0); }

  // -- copy --

  /// structural copy of `edge` (usually from another manager) into self.
  pub fn copy_in(&mut self, src: &AigBase, edge: AigEdge,
                 dict: &mut FxHashMap<u32, AigEdge>)->AigEdge {
    if edge.is_const() { return edge }
    let id = edge.node();
    let new_edge = if let Some(&e) = dict.get(&id) { e }
    else {
      let e = match src.nodes[id as usize].kind {
        AigNodeKind::Input(i) => {
          self.reserve_inputs(i as usize + 1);
          self.input(i as usize) }
        AigNodeKind::And(f0, f1) => {
          let e0 = self.copy_in(src, f0, dict);
          let e1 = self.copy_in(src, f1, dict);
          self.and_op(e0, e1) }};
      dict.insert(id, e);
      e };
    new_edge.inv_if(edge.inv()) }

  // -- output --

  pub fn print(&self, w: &mut dyn fmt::Write)->fmt::Result {
    for node in &self.nodes {
      write!(w, "Node#{}[{}]: ", node.id, node.refs)?;
      match node.kind {
        AigNodeKind::Input(i) => writeln!(w, "Input#{}", i)?,
        AigNodeKind::And(f0, f1) => writeln!(w, "And({}, {})", f0, f1)? }}
    writeln!(w, "# of inputs:  {}", self.input_num())?;
    writeln!(w, "# of ANDs:    {}", self.and_num())?;
    writeln!(w, "# of handles: {}",
             self.handles.iter().filter(|w| w.strong_count() > 0).count()) }

  pub fn gen_dot(&self, w: &mut dyn fmt::Write, roots: &[AigEdge],
                 option: &JsonValue)->Result<()> {
    let opts = DotOpts::parse(option)?;
    let mut mark = FxHashSet::default();
    for &e in roots {
      if !e.is_const() { self.size_dfs(e.node(), &mut mark); }}
    let mut order: Vec<u32> = mark.into_iter().collect();
    order.sort_unstable();
    let mut dw = DotWriter::new(w);
    dw.graph_begin("aig", &opts.graph);
    for (i, _) in roots.iter().enumerate() {
      let mut attrs = opts.root.clone();
      attrs.insert("label".to_string(), format!("AIG#{}", i + 1));
      dw.write_node(&format!("root{}", i + 1), &attrs); }
    let uses_const = roots.iter().any(|e| e.is_const());
    if uses_const {
      dw.write_node("const0", &opts.terminal0_attrs());
      dw.write_node("const1", &opts.terminal1_attrs()); }
    for &id in &order {
      let node = &self.nodes[id as usize];
      match node.kind {
        AigNodeKind::Input(i) => {
          let mut attrs = opts.label_attrs(i, &opts.terminal);
          attrs.entry("label".to_string()).or_insert_with(|| format!("i{}", i));
          dw.write_node(&format!("node{}", id), &attrs); }
        AigNodeKind::And(..) => {
          let mut attrs = opts.node.clone();
          attrs.entry("label".to_string()).or_insert_with(|| "∧".to_string());
          dw.write_node(&format!("node{}", id), &attrs); }}}
    let edge_name = |e: AigEdge| {
      if e.is_zero() { "const0".to_string() }
      else if e.is_one() { "const1".to_string() }
      else { format!("node{}", e.node()) }};
    let inv_attrs = |mut attrs: crate::dot::AttrList, inv: bool| {
      if inv {
        attrs.insert("dir".to_string(), "both".to_string());
        attrs.insert("arrowtail".to_string(), "odot".to_string()); }
      attrs };
    for (i, &e) in roots.iter().enumerate() {
      dw.write_edge(&format!("root{}", i + 1), &edge_name(e),
                    &inv_attrs(opts.edge.clone(), e.inv())); }
    for &id in &order {
      if let AigNodeKind::And(f0, f1) = self.nodes[id as usize].kind {
        dw.write_edge(&format!("node{}", id), &edge_name(f0),
                      &inv_attrs(opts.edge0_attrs(), f0.inv()));
        dw.write_edge(&format!("node{}", id), &edge_name(f1),
                      &inv_attrs(opts.edge1_attrs(), f1.inv())); }}
    let root_names: Vec<String> = (1..=roots.len()).map(|i| format!("root{}", i)).collect();
    if !root_names.is_empty() { dw.write_rank_group(&root_names, "min"); }
    dw.graph_end();
    Ok(()) }}


// -- the shared manager --------------------------------------------------

/// The AIG manager: a shared, reference-counted wrapper around the node
/// store. Cloning is cheap and shares the store.
#[derive(Clone)]
pub struct AigMgr { ptr: Rc<RefCell<AigBase>> }

impl Default for AigMgr { fn default()->Self { Self::new() }}

/// Primitive gate kinds accepted by [`AigMgr::primitive_op`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrimOp { Zero, One, Buff, Not, And, Nand, Or, Nor, Xor, Xnor }

impl AigMgr {
  pub fn new()->AigMgr { AigMgr { ptr: Rc::new(RefCell::new(AigBase::new())) }}

  fn handle(&self, edge: AigEdge)->AigHandle {
    AigHandle::bind(Some(self.ptr.clone()), edge) }

  /// the edge for `h`, checking that it belongs to this manager.
  fn edge_of(&self, h: &AigHandle)->AigEdge {
    match &h.mgr {
      None => h.edge(),
      Some(m) => {
        assert!(Rc::ptr_eq(m, &self.ptr), "invalid argument: handle from another manager");
        h.edge() }}}

  fn edges_of(&self, hs: &[AigHandle])->Vec<AigEdge> {
    hs.iter().map(|h| self.edge_of(h)).collect() }

  pub fn input_count(&self)->usize { self.ptr.borrow().input_num() }
  pub fn node_count(&self)->usize { self.ptr.borrow().node_num() }
  pub fn and_count(&self)->usize { self.ptr.borrow().and_num() }

  /// a fresh input. Inputs are never garbage-collected.
  pub fn make_input(&self)->AigHandle {
    let e = self.ptr.borrow_mut().make_input();
    self.handle(e) }

  /// the existing input with index `i`.
  pub fn input(&self, i: usize)->AigHandle {
    let e = self.ptr.borrow().input(i);
    self.handle(e) }

  pub fn and(&self, a: &AigHandle, b: &AigHandle)->AigHandle {
    let (ea, eb) = (self.edge_of(a), self.edge_of(b));
    let e = self.ptr.borrow_mut().and_op(ea, eb);
    self.handle(e) }

  pub fn or(&self, a: &AigHandle, b: &AigHandle)->AigHandle {
    let (ea, eb) = (self.edge_of(a), self.edge_of(b));
    let e = self.ptr.borrow_mut().or_op(ea, eb);
    self.handle(e) }

  pub fn xor(&self, a: &AigHandle, b: &AigHandle)->AigHandle {
    let (ea, eb) = (self.edge_of(a), self.edge_of(b));
    let e = self.ptr.borrow_mut().xor_op(ea, eb);
    self.handle(e) }

  pub fn and_many(&self, hs: &[AigHandle])->AigHandle {
    let es = self.edges_of(hs);
    let e = self.ptr.borrow_mut().and_many(&es);
    self.handle(e) }

  pub fn or_many(&self, hs: &[AigHandle])->AigHandle {
    let es = self.edges_of(hs);
    let e = self.ptr.borrow_mut().or_many(&es);
    self.handle(e) }

  pub fn xor_many(&self, hs: &[AigHandle])->AigHandle {
    let es = self.edges_of(hs);
    let e = self.ptr.borrow_mut().xor_many(&es);
    self.handle(e) }

  pub fn primitive_op(&self, op: PrimOp, hs: &[AigHandle])->AigHandle {
    let check1 = || assert!(hs.len() == 1, "invalid argument: {:?} takes one operand", op);
    match op {
      PrimOp::Zero => AigHandle::zero(),
      PrimOp::One => AigHandle::one(),
      PrimOp::Buff => { check1(); hs[0].clone() }
      PrimOp::Not => { check1(); !&hs[0] }
      PrimOp::And => self.and_many(hs),
      PrimOp::Nand => !&self.and_many(hs),
      PrimOp::Or => self.or_many(hs),
      PrimOp::Nor => !&self.or_many(hs),
      PrimOp::Xor => self.xor_many(hs),
      PrimOp::Xnor => !&self.xor_many(hs) }}

  /// lower an expression; variable `i` maps to input `i`, growing the
  /// input array as needed.
  pub fn from_expr(&self, expr: &Expr)->AigHandle {
    let e = {
      let mut base = self.ptr.borrow_mut();
      base.reserve_inputs(expr.input_size());
      let input_list: Vec<AigEdge> = (0..base.input_num()).map(|i| base.input(i)).collect();
      base.from_expr(expr, &input_list) };
    self.handle(e) }

  pub fn from_expr_list(&self, exprs: &[Expr])->Vec<AigHandle> {
    let n = exprs.iter().map(|x| x.input_size()).max().unwrap_or(0);
    let es = {
      let mut base = self.ptr.borrow_mut();
      base.reserve_inputs(n);
      let input_list: Vec<AigEdge> = (0..base.input_num()).map(|i| base.input(i)).collect();
      exprs.iter().map(|x| base.from_expr(x, &input_list)).collect::<Vec<_>>() };
    es.into_iter().map(|e| self.handle(e)).collect() }

  /// lower a cover; cover variable `i` maps to input `i`.
  pub fn from_cover(&self, cover: &SopCover)->AigHandle {
    let e = {
      let mut base = self.ptr.borrow_mut();
      base.reserve_inputs(cover.variable_num());
      let input_list: Vec<AigEdge> = (0..base.input_num()).map(|i| base.input(i)).collect();
      base.from_cover(cover, &input_list) };
    self.handle(e) }

  /// lower a cube; cube variable `i` maps to input `i`.
  pub fn from_cube(&self, cube: &SopCube)->AigHandle {
    let e = {
      let mut base = self.ptr.borrow_mut();
      base.reserve_inputs(cube.variable_num());
      let input_list: Vec<AigEdge> = (0..base.input_num()).map(|i| base.input(i)).collect();
      base.from_cube(cube, &input_list) };
    self.handle(e) }

  /// cofactor the targets under the cube of fixed nodes.
  pub fn cofactor(&self, cube: &[AigHandle], targets: &[AigHandle])->Vec<AigHandle> {
    let cedges = self.edges_of(cube);
    let tedges = self.edges_of(targets);
    let es = self.ptr.borrow_mut().cofactor_list(&cedges, &tedges);
    es.into_iter().map(|e| self.handle(e)).collect() }

  /// bit-parallel simulation of the outputs under the input values.
  pub fn eval(&self, input_vals: &[AigBitVect], outputs: &[AigHandle])->Vec<AigBitVect> {
    let es = self.edges_of(outputs);
    self.ptr.borrow().eval_list(input_vals, &es) }

  /// structural copy of a (possibly foreign) handle into this manager.
  pub fn copy(&self, h: &AigHandle)->AigHandle {
    match &h.mgr {
      None => h.clone(),
      Some(m) if Rc::ptr_eq(m, &self.ptr) => h.clone(),
      Some(m) => {
        let src = m.borrow();
        let mut dict = FxHashMap::default();
        let e = self.ptr.borrow_mut().copy_in(&src, h.edge(), &mut dict);
        self.handle(e) }}}

  pub fn copy_list(&self, hs: &[AigHandle])->Vec<AigHandle> {
    hs.iter().map(|h| self.copy(h)).collect() }

  /// local rewriting: reshape the graph to use fewer AND nodes while
  /// preserving the function of every live handle.
  pub fn rewrite(&self) { self.ptr.borrow_mut().rewrite(); }

  /// reclaim every AND node with a zero reference count.
  pub fn sweep(&self) { self.ptr.borrow_mut().sweep(); }

  pub fn print(&self, w: &mut dyn fmt::Write)->fmt::Result { self.ptr.borrow().print(w) }

  pub fn gen_dot(&self, w: &mut dyn fmt::Write, roots: &[AigHandle],
                 option: &JsonValue)->Result<()> {
    let es = self.edges_of(roots);
    self.ptr.borrow().gen_dot(w, &es, option) }}


// -- handles -------------------------------------------------------------

/// A reference-counted smart pointer to one edge of one manager.
///
/// Handles are the only externally visible object. Every construction and
/// destruction updates the reference count of the pointed-to node, and the
/// manager registers the handle slot so structural rewrites can patch it.
pub struct AigHandle {
  mgr: Option<Rc<RefCell<AigBase>>>,
  slot: Rc<Cell<u64>>,
}

impl AigHandle {
  fn bind(mgr: Option<Rc<RefCell<AigBase>>>, edge: AigEdge)->AigHandle {
    let slot = Rc::new(Cell::new(edge.packed));
    if let Some(m) = &mgr {
      let mut base = m.borrow_mut();
      if !edge.is_const() { base.inc_node_ref(edge.node()); }
      base.add_handle(&slot); }
    AigHandle { mgr, slot }}

  /// the constant-0 handle. Not tied to any manager.
  pub fn zero()->AigHandle { AigHandle::bind(None, AigEdge::zero()) }
  /// the constant-1 handle. Not tied to any manager.
  pub fn one()->AigHandle { AigHandle::bind(None, AigEdge::one()) }

  #[inline] pub(crate) fn edge(&self)->AigEdge { AigEdge::from_packed(self.slot.get()) }

  /// the manager this handle lives in.
  pub fn mgr(&self)->Option<AigMgr> { self.mgr.as_ref().map(|m| AigMgr { ptr: m.clone() }) }

  fn require_mgr(&self)->&Rc<RefCell<AigBase>> {
    self.mgr.as_ref().expect("invalid argument: constant handle has no manager") }

  fn same_mgr(&self, other: &AigHandle)->AigMgr {
    let m = match (&self.mgr, &other.mgr) {
      (Some(a), Some(b)) => {
        assert!(Rc::ptr_eq(a, b), "invalid argument: handles from different managers");
        a.clone() }
      (Some(a), None) => a.clone(),
      (None, Some(b)) => b.clone(),
      (None, None) => panic!("logic error: no manager for a non-trivial operation") };
    AigMgr { ptr: m }}

  pub fn is_zero(&self)->bool { self.edge().is_zero() }
  pub fn is_one(&self)->bool { self.edge().is_one() }
  pub fn is_const(&self)->bool { self.edge().is_const() }
  pub fn inv(&self)->bool { self.edge().inv() }
  pub fn index(&self)->u64 { self.edge().index() }

  /// multiply by an inversion flag: inverted when `inv` is true.
  pub fn inv_if(&self, inv: bool)->AigHandle {
    AigHandle::bind(self.mgr.clone(), self.edge().inv_if(inv)) }
  /// the same endpoint with the inverter cleared.
  pub fn positive_handle(&self)->AigHandle {
    AigHandle::bind(self.mgr.clone(), self.edge().positive_edge()) }
  /// the same endpoint with the inverter set.
  pub fn negative_handle(&self)->AigHandle {
    AigHandle::bind(self.mgr.clone(), self.edge().negative_edge()) }

  pub fn is_input(&self)->bool {
    !self.is_const() && self.require_mgr().borrow().edge_is_input(self.edge()) }

  pub fn is_and(&self)->bool {
    !self.is_const() && self.require_mgr().borrow().edge_is_and(self.edge()) }

  /// the input index. Valid only on input handles.
  pub fn input_id(&self)->u32 {
    assert!(!self.is_const(), "invalid argument: input_id() is valid if is_input() == true");
    self.require_mgr().borrow().node(self.edge().node()).input_id() }

  pub fn fanin0(&self)->AigHandle {
    assert!(!self.is_const(), "invalid argument: fanin0() is valid if is_and() == true");
    let m = self.require_mgr().clone();
    let e = m.borrow().node(self.edge().node()).fanin0();
    AigHandle::bind(Some(m), e) }

  pub fn fanin1(&self)->AigHandle {
    assert!(!self.is_const(), "invalid argument: fanin1() is valid if is_and() == true");
    let m = self.require_mgr().clone();
    let e = m.borrow().node(self.edge().node()).fanin1();
    AigHandle::bind(Some(m), e) }

  pub fn fanin(&self, pos: usize)->AigHandle {
    if pos & 1 == 0 { self.fanin0() } else { self.fanin1() }}

  /// the AND-group fanins: leaves of the maximal non-inverted AND tree
  /// rooted here.
  pub fn ex_fanin_list(&self)->Vec<AigHandle> {
    let m = self.require_mgr().clone();
    let es = m.borrow().ex_fanin_list(self.edge());
    es.into_iter().map(|e| AigHandle::bind(Some(m.clone()), e)).collect() }

  /// the number of nodes in this handle's cone.
  pub fn size(&self)->usize {
    if self.is_const() { return 0 }
    self.require_mgr().borrow().size(&[self.edge()]) }

  /// bit-parallel simulation of this handle under the input values.
  pub fn eval(&self, input_vals: &[AigBitVect])->AigBitVect {
    if self.is_zero() { return 0 }
    if self.is_one() { return !0 }
    self.require_mgr().borrow().eval(input_vals, self.edge()) }

  /// cofactor this handle under a cube of fixed nodes.
  pub fn cofactor(&self, cube: &[AigHandle])->AigHandle {
    if self.is_const() { return self.clone() }
    let mgr = AigMgr { ptr: self.require_mgr().clone() };
    let mut res = mgr.cofactor(cube, std::slice::from_ref(self));
    res.pop().unwrap() }

  pub fn gen_dot(&self, w: &mut dyn fmt::Write, option: &JsonValue)->Result<()> {
    self.require_mgr().borrow().gen_dot(w, &[self.edge()], option) }

  /// a stable hash mixing the manager identity and the edge index.
  pub fn hash(&self)->u64 {
    let m = match &self.mgr {
      Some(m) => Rc::as_ptr(m) as u64,
      None => 0 };
    (m.wrapping_mul(m) >> 20).wrapping_add(self.index()) }}

impl Clone for AigHandle {
  fn clone(&self)->AigHandle { AigHandle::bind(self.mgr.clone(), self.edge()) }}

impl Drop for AigHandle {
  fn drop(&mut self) {
    if let Some(m) = &self.mgr {
      let edge = self.edge();
      if !edge.is_const() { m.borrow_mut().dec_node_ref(edge.node()); }}}}

impl PartialEq for AigHandle {
  fn eq(&self, other: &AigHandle)->bool {
    let same_mgr = match (&self.mgr, &other.mgr) {
      (Some(a), Some(b)) => Rc::ptr_eq(a, b),
      (None, None) => true,
      _ => false };
    same_mgr && self.edge() == other.edge() }}

impl Eq for AigHandle {}

impl PartialOrd for AigHandle {
  fn partial_cmp(&self, other: &AigHandle)->Option<std::cmp::Ordering> {
    Some(self.cmp(other)) }}

impl Ord for AigHandle {
  /// ordered by edge index; both handles must share a manager.
  fn cmp(&self, other: &AigHandle)->std::cmp::Ordering {
    if let (Some(a), Some(b)) = (&self.mgr, &other.mgr) {
      assert!(Rc::ptr_eq(a, b), "invalid argument: handles from different managers"); }
    self.index().cmp(&other.index()) }}

impl std::ops::Not for &AigHandle {
  type Output = AigHandle;
  fn not(self)->AigHandle { AigHandle::bind(self.mgr.clone(), !self.edge()) }}

impl std::ops::Not for AigHandle {
  type Output = AigHandle;
  fn not(self)->AigHandle { !&self }}

impl std::ops::BitAnd for &AigHandle {
  type Output = AigHandle;
  fn bitand(self, rhs: &AigHandle)->AigHandle {
    if self.is_zero() || rhs.is_zero() { return AigHandle::zero() }
    if self.is_one() { return rhs.clone() }
    if rhs.is_one() { return self.clone() }
    let mgr = self.same_mgr(rhs);
    mgr.and(self, rhs) }}

impl std::ops::BitOr for &AigHandle {
  type Output = AigHandle;
  fn bitor(self, rhs: &AigHandle)->AigHandle {
    if self.is_one() || rhs.is_one() { return AigHandle::one() }
    if self.is_zero() { return rhs.clone() }
    if rhs.is_zero() { return self.clone() }
    let mgr = self.same_mgr(rhs);
    mgr.or(self, rhs) }}

impl std::ops::BitXor for &AigHandle {
  type Output = AigHandle;
  fn bitxor(self, rhs: &AigHandle)->AigHandle {
    if self.is_zero() { return rhs.clone() }
    if rhs.is_zero() { return self.clone() }
    if self.is_one() { return !rhs }
    if rhs.is_one() { return !self }
    let mgr = self.same_mgr(rhs);
    mgr.xor(self, rhs) }}

impl fmt::Display for AigHandle {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self.edge()) }}

impl fmt::Debug for AigHandle {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self) }}


impl AigMgr {
  /// handles for literals over the manager's inputs.
  pub fn lit_handles(&self, lits: &[Lit])->Vec<AigHandle> {
    lits.iter().map(|l| {
      let h = self.input(l.var() as usize);
      if l.inv() { !&h } else { h }}).collect() }}


include!("test-aig.rs");
