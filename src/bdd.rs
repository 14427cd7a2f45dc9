//! Reduced ordered binary decision diagrams.
//!
//! Nodes are decision points on variables at fixed levels, shared through
//! a unique table with the canonical rule that a node's 0-branch is never
//! inverted; any edge whose then-branch would be inverted is represented
//! by negating the whole edge. The result is one canonical root per
//! Boolean function per manager. Handles ([`Bdd`]) pin their root through
//! reference counts; node creation pins children eagerly, so everything a
//! live handle can reach survives [`BddMgr::gc`].
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use fxhash::FxHashMap;
use json::JsonValue;
use crate::err::{Error, Result};
use crate::expr::Expr;
use crate::lit::Lit;

mod apply;
mod cofactor;
mod support;
mod dump;

pub use support::BddVarSet;

/// node count that arms the first automatic garbage collection.
const GC_LIMIT0: usize = 1024;


// -- edges ---------------------------------------------------------------

/// An edge: a node id plus an inversion flag, packed into one word as
/// `(id + 1) << 1 | inv`. `0` is the constant false edge and `1` true.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct BddEdge { packed: u64 }

impl BddEdge {
  pub const fn zero()->BddEdge { BddEdge { packed: 0 }}
  pub const fn one()->BddEdge { BddEdge { packed: 1 }}
  pub fn new(node: u32, inv: bool)->BddEdge {
    BddEdge { packed: ((node as u64 + 1) << 1) | (inv as u64) }}
  pub fn from_packed(packed: u64)->BddEdge { BddEdge { packed }}

  #[inline] pub fn is_zero(self)->bool { self.packed == 0 }
  #[inline] pub fn is_one(self)->bool { self.packed == 1 }
  #[inline] pub fn is_const(self)->bool { self.packed & !1 == 0 }
  #[inline] pub fn inv(self)->bool { self.packed & 1 != 0 }
  #[inline] pub fn node(self)->u32 { (self.packed >> 1) as u32 - 1 }
  #[inline] pub fn packed(self)->u64 { self.packed }
  #[inline] pub fn positive(self)->BddEdge { BddEdge { packed: self.packed & !1 }}
  #[inline] pub fn inv_if(self, inv: bool)->BddEdge { BddEdge { packed: self.packed ^ inv as u64 }}}

impl std::ops::Not for BddEdge {
  type Output = BddEdge;
  fn not(self)->BddEdge { BddEdge { packed: self.packed ^ 1 }}}

impl fmt::Debug for BddEdge {
  fn fmt(&self, f: &mut fmt::Formatter)->fmt::Result {
    if self.is_zero() { write!(f, "ZERO") }
    else if self.is_one() { write!(f, "ONE") }
    else { write!(f, "{}{}", self.node(), if self.inv() { "~" } else { "" }) }}}


// -- nodes ---------------------------------------------------------------

/// level, 0-branch, 1-branch, reference count. A freed slot keeps the
/// `FREE` sentinel level until reused.
#[derive(Clone, Copy, Debug)]
pub(crate) struct BddNode {
  pub level: u32,
  pub e0: BddEdge,
  pub e1: BddEdge,
  pub refs: u32,
}

const FREE: u32 = u32::MAX;


// -- the manager body ----------------------------------------------------

pub(crate) struct BddBase {
  /// slot-indexed node arena; freed slots carry the FREE sentinel.
  pub(crate) nodes: Vec<BddNode>,
  free: Vec<u32>,
  live: usize,
  /// unique table: (level, e0, e1) -> node id, e0 always non-inverted.
  table: FxHashMap<(u32, u64, u64), u32>,
  /// operation caches, cleared by garbage collection.
  pub(crate) and_cache: FxHashMap<(u64, u64), BddEdge>,
  pub(crate) xor_cache: FxHashMap<(u64, u64), BddEdge>,
  pub(crate) ite_cache: FxHashMap<(u64, u64, u64), BddEdge>,
  /// variable id -> level.
  var_to_level: Vec<u32>,
  /// level -> variable id.
  level_to_var: Vec<u32>,
  /// variable id -> the variable's node edge (pinned by the manager).
  var_edges: Vec<BddEdge>,
  gc_enable: bool,
  gc_limit: usize,
}

impl BddBase {
  pub fn new()->BddBase {
    BddBase { nodes: vec![], free: vec![], live: 0,
              table: FxHashMap::default(),
              and_cache: FxHashMap::default(),
              xor_cache: FxHashMap::default(),
              ite_cache: FxHashMap::default(),
              var_to_level: vec![], level_to_var: vec![], var_edges: vec![],
              gc_enable: true, gc_limit: GC_LIMIT0 }}

  pub fn node_num(&self)->usize { self.live }
  pub fn variable_num(&self)->usize { self.var_to_level.len() }

  pub fn node(&self, id: u32)->&BddNode { &self.nodes[id as usize] }
  pub fn level(&self, e: BddEdge)->u32 {
    if e.is_const() { FREE } else { self.nodes[e.node() as usize].level }}
  pub fn level_to_var(&self, level: u32)->u32 { self.level_to_var[level as usize] }
  pub fn var_to_level(&self, var: u32)->u32 { self.var_to_level[var as usize] }

  /// the i-th variable's edge, allocating variables as needed.
  pub fn variable(&mut self, varid: usize)->BddEdge {
    while self.var_edges.len() <= varid {
      let var = self.var_edges.len() as u32;
      let level = var;  // fresh variables go below every existing one
      self.var_to_level.push(level);
      self.level_to_var.push(var);
      let e = self.new_node(level, BddEdge::zero(), BddEdge::one());
      self.inc_ref(e);  // the manager itself pins its variables
      self.var_edges.push(e); }
    self.var_edges[varid] }

  pub fn variable_edges(&self)->&[BddEdge] { &self.var_edges }

  /// variable ids topmost-first.
  pub fn variable_order(&self)->Vec<u32> { self.level_to_var.clone() }

  /// install a new order. Only accepted while the manager holds no nodes
  /// beyond the variables themselves.
  pub fn set_variable_order(&mut self, order: &[u32])->Result<()> {
    let nv = self.variable_num();
    if order.len() != nv {
      return Err(Error::invalid_argument("order list must mention every variable once")) }
    let mut seen = vec![false; nv];
    for &v in order {
      if v as usize >= nv || seen[v as usize] {
        return Err(Error::invalid_argument("order list must mention every variable once")) }
      seen[v as usize] = true; }
    if self.live != nv {
      return Err(Error::invalid_argument(
        "variable order can only change while no nodes other than variables exist")) }
    self.table.clear();
    self.clear_caches();
    for (level, &var) in order.iter().enumerate() {
      self.level_to_var[level] = var;
      self.var_to_level[var as usize] = level as u32;
      let id = self.var_edges[var as usize].node();
      self.nodes[id as usize].level = level as u32;
      self.table.insert((level as u32, BddEdge::zero().packed, BddEdge::one().packed), id); }
    Ok(()) }

  // -- node creation --

  /// hash-consing node constructor; canonicalizes so the 0-branch is
  /// never inverted and equal branches collapse.
  pub fn new_node(&mut self, level: u32, e0: BddEdge, e1: BddEdge)->BddEdge {
    if e0 == e1 { return e0 }
    let oinv = e0.inv();
    let e0 = e0.inv_if(oinv);
    let e1 = e1.inv_if(oinv);
    let key = (level, e0.packed, e1.packed);
    let id = match self.table.get(&key) {
      Some(&id) => id,
      None => {
        let id = match self.free.pop() {
          Some(id) => {
            self.nodes[id as usize] = BddNode { level, e0, e1, refs: 0 };
            id }
          None => {
            let id = self.nodes.len() as u32;
            self.nodes.push(BddNode { level, e0, e1, refs: 0 });
            id }};
        self.live += 1;
        self.inc_ref(e0);
        self.inc_ref(e1);
        self.table.insert(key, id);
        id }};
    BddEdge::new(id, oinv) }

  pub fn inc_ref(&mut self, e: BddEdge) {
    if !e.is_const() { self.nodes[e.node() as usize].refs += 1; }}

  pub fn dec_ref(&mut self, e: BddEdge) {
    if !e.is_const() { self.nodes[e.node() as usize].refs -= 1; }}

  // -- garbage collection --

  pub fn clear_caches(&mut self) {
    self.and_cache.clear();
    self.xor_cache.clear();
    self.ite_cache.clear(); }

  /// free every node with a zero reference count, cascading into the
  /// children it was pinning. Reachable nodes keep their identity.
  pub fn garbage_collection(&mut self) {
    let mut dead: Vec<u32> = (0..self.nodes.len() as u32)
      .filter(|&id| self.nodes[id as usize].level != FREE && self.nodes[id as usize].refs == 0)
      .collect();
    let before = self.live;
    while let Some(id) = dead.pop() {
      let node = self.nodes[id as usize];
      if node.level == FREE || node.refs > 0 { continue }
      self.table.remove(&(node.level, node.e0.packed, node.e1.packed));
      for child in [node.e0, node.e1] {
        if !child.is_const() {
          let c = child.node();
          self.nodes[c as usize].refs -= 1;
          if self.nodes[c as usize].refs == 0 { dead.push(c); }}}
      self.nodes[id as usize].level = FREE;
      self.free.push(id);
      self.live -= 1; }
    self.clear_caches();
    self.gc_limit *= 2;
    debug!("gc: collected {} nodes, {} live, next limit {}",
           before - self.live, self.live, self.gc_limit); }

  /// run gc when enabled and over the threshold. Only called between
  /// operations, never mid-recursion.
  pub fn maybe_gc(&mut self) {
    if self.gc_enable && self.live >= self.gc_limit { self.garbage_collection(); }}

  pub fn gc_limit(&self)->usize { self.gc_limit }
  pub fn set_gc_limit(&mut self, limit: usize) { self.gc_limit = limit; }
  pub fn enable_gc(&mut self) { self.gc_enable = true; }
  pub fn disable_gc(&mut self) { self.gc_enable = false; }

  // -- shared decomposition helper --

  /// split two operands at the topmost level between them; an operand
  /// above the split level yields itself on both branches.
  pub(crate) fn decomp(&self, left: BddEdge, right: BddEdge)
                       ->(u32, BddEdge, BddEdge, BddEdge, BddEdge) {
    let l_level = self.level(left);
    let r_level = self.level(right);
    let top = l_level.min(r_level);
    let (l0, l1) = if l_level == top { self.branches(left) } else { (left, left) };
    let (r0, r1) = if r_level == top { self.branches(right) } else { (right, right) };
    (top, l0, l1, r0, r1) }

  /// both cofactors of an edge at its own top level.
  pub(crate) fn branches(&self, e: BddEdge)->(BddEdge, BddEdge) {
    let node = &self.nodes[e.node() as usize];
    (node.e0.inv_if(e.inv()), node.e1.inv_if(e.inv())) }

  // -- truth tables --

  /// build from a `2^n` 0/1 string over the given variables (top one
  /// first). Bit `i` of the string, counting from the end, is the value
  /// at minterm `i`; the first variable is the most significant bit.
  pub fn from_truth(&mut self, s: &str, var_edges: &[BddEdge])->Result<BddEdge> {
    let n = var_edges.len();
    if s.len() != (1usize << n) {
      return Err(Error::invalid_argument(
        format!("truth table of length {} needs {} variables", s.len(), n))) }
    if !s.bytes().all(|b| b == b'0' || b == b'1') {
      return Err(Error::invalid_argument("truth table may only contain 0 and 1")) }
    let mut cache: FxHashMap<&str, BddEdge> = FxHashMap::default();
    Ok(self.truth_step(s, var_edges, 0, &mut cache)) }

  fn truth_step<'a>(&mut self, s: &'a str, var_edges: &[BddEdge], pos: usize,
                    cache: &mut FxHashMap<&'a str, BddEdge>)->BddEdge {
    if s == "0" { return BddEdge::zero() }
    if s == "1" { return BddEdge::one() }
    if let Some(&e) = cache.get(s) { return e }
    let h = s.len() / 2;
    let s1 = &s[..h];  // first half: the variable at `pos` is 1
    let s0 = &s[h..];
    let e1 = self.truth_step(s1, var_edges, pos + 1, cache);
    let e0 = self.truth_step(s0, var_edges, pos + 1, cache);
    let e = self.ite(var_edges[pos], e1, e0);
    cache.insert(s, e);
    e }

  /// evaluate under an assignment keyed by variable id.
  pub fn eval(&self, e: BddEdge, vals: &[bool])->bool {
    let mut e = e;
    loop {
      if e.is_const() { return e.is_one() }
      let node = &self.nodes[e.node() as usize];
      let var = self.level_to_var[node.level as usize] as usize;
      assert!(var < vals.len(), "invalid argument: no value for variable {}", var);
      let next = if vals[var] { node.e1 } else { node.e0 };
      e = next.inv_if(e.inv()); }}

  /// the inverse of from_truth over the same variable list.
  pub fn to_truth(&self, e: BddEdge, vars: &[u32])->Result<String> {
    let n = vars.len();
    assert!(n <= 16, "invalid argument: refusing to build a truth table over {} variables", n);
    let nbits = 1usize << n;
    let mut buf = vec![b'0'; nbits];
    let mut vals: FxHashMap<u32, bool> = FxHashMap::default();
    for i in 0..nbits {
      vals.clear();
      for (k, &v) in vars.iter().enumerate() {
        vals.insert(v, (i >> (n - 1 - k)) & 1 != 0); }
      if self.eval_partial(e, &vals)? { buf[nbits - 1 - i] = b'1'; }}
    Ok(String::from_utf8(buf).unwrap()) }

  fn eval_partial(&self, e: BddEdge, vals: &FxHashMap<u32, bool>)->Result<bool> {
    let mut e = e;
    loop {
      if e.is_const() { return Ok(e.is_one()) }
      let node = &self.nodes[e.node() as usize];
      let var = self.level_to_var[node.level as usize];
      let &val = vals.get(&var).ok_or_else(|| Error::invalid_argument(
        format!("variable {} is in the support but not in the list", var)))?;
      let next = if val { node.e1 } else { node.e0 };
      e = next.inv_if(e.inv()); }}}


// -- the shared manager --------------------------------------------------

/// The BDD manager: a shared, reference-counted wrapper around the node
/// store. Cloning is cheap and shares the store.
#[derive(Clone)]
pub struct BddMgr { ptr: Rc<RefCell<BddBase>> }

impl Default for BddMgr { fn default()->Self { Self::new() }}

impl BddMgr {
  pub fn new()->BddMgr { BddMgr { ptr: Rc::new(RefCell::new(BddBase::new())) }}

  pub(crate) fn bdd(&self, edge: BddEdge)->Bdd { Bdd::bind(self.ptr.clone(), edge) }

  pub(crate) fn base(&self)->std::cell::Ref<'_, BddBase> { self.ptr.borrow() }
  pub(crate) fn base_mut(&self)->std::cell::RefMut<'_, BddBase> { self.ptr.borrow_mut() }
  pub(crate) fn same_ptr(&self, other: &Rc<RefCell<BddBase>>)->bool {
    Rc::ptr_eq(&self.ptr, other) }

  pub fn variable_count(&self)->usize { self.base().variable_num() }
  pub fn node_count(&self)->usize { self.base().node_num() }

  /// the constant false function.
  pub fn zero(&self)->Bdd { self.bdd(BddEdge::zero()) }
  /// the constant true function.
  pub fn one(&self)->Bdd { self.bdd(BddEdge::one()) }

  /// the i-th variable, allocating as needed.
  pub fn variable(&self, i: usize)->BddVar {
    let e = self.base_mut().variable(i);
    BddVar { bdd: self.bdd(e), id: i as u32 }}

  pub fn variable_list(&self)->Vec<BddVar> {
    (0..self.variable_count()).map(|i| self.variable(i)).collect() }

  /// the variables topmost-first.
  pub fn variable_order(&self)->Vec<BddVar> {
    let order = self.base().variable_order();
    order.into_iter().map(|v| self.variable(v as usize)).collect() }

  /// install a new variable order: only accepted while the manager
  /// holds no nodes beyond the variables themselves.
  pub fn set_variable_order(&self, order: &[BddVar])->Result<()> {
    let ids: Vec<u32> = order.iter().map(|v| v.id).collect();
    self.base_mut().set_variable_order(&ids) }

  /// build from a truth-table string over variables `0..n`.
  pub fn from_truth(&self, s: &str)->Result<Bdd> {
    if s.is_empty() || !s.len().is_power_of_two() {
      return Err(Error::invalid_argument("truth table length must be a power of two")) }
    let n = s.len().trailing_zeros() as usize;
    let vars = self.variable_list_n(n);
    self.from_truth_vars(s, &vars) }

  /// build from a truth-table string over the given variables (first
  /// variable = most significant minterm bit).
  pub fn from_truth_vars(&self, s: &str, vars: &[BddVar])->Result<Bdd> {
    self.check_vars(vars);
    let e = {
      let mut base = self.base_mut();
      base.maybe_gc();
      let ves: Vec<BddEdge> = vars.iter().map(|v| v.bdd.edge).collect();
      base.from_truth(s, &ves)? };
    Ok(self.bdd(e)) }

  fn variable_list_n(&self, n: usize)->Vec<BddVar> {
    (0..n).map(|i| self.variable(i)).collect() }

  fn check_vars(&self, vars: &[BddVar]) {
    for v in vars {
      assert!(self.same_ptr(&v.bdd.mgr), "invalid argument: variable from another manager"); }}

  /// lower an expression; expression variable `i` maps to variable `i`.
  pub fn from_expr(&self, expr: &Expr)->Bdd {
    let vars = self.variable_list_n(expr.input_size());
    self.from_expr_vars(expr, &vars) }

  /// lower an expression over the given variables.
  pub fn from_expr_vars(&self, expr: &Expr, vars: &[BddVar])->Bdd {
    self.check_vars(vars);
    let e = {
      let mut base = self.base_mut();
      base.maybe_gc();
      let ves: Vec<BddEdge> = vars.iter().map(|v| v.bdd.edge).collect();
      Self::expr_step(&mut base, expr, &ves) };
    self.bdd(e) }

  fn expr_step(base: &mut BddBase, expr: &Expr, vars: &[BddEdge])->BddEdge {
    if expr.is_zero() { return BddEdge::zero() }
    if expr.is_one() { return BddEdge::one() }
    if let Some(lit) = expr.lit() {
      assert!((lit.var() as usize) < vars.len(), "invalid argument: variable list is too small");
      return vars[lit.var() as usize].inv_if(lit.inv()) }
    let opers: Vec<BddEdge> = expr.operands().iter()
      .map(|x| Self::expr_step(base, x, vars)).collect();
    let mut it = opers.into_iter();
    let first = it.next().expect("logic error: operator with no operands");
    if expr.is_and() { it.fold(first, |a, b| base.and(a, b)) }
    else if expr.is_or() { it.fold(first, |a, b| base.or(a, b)) }
    else { it.fold(first, |a, b| base.xor(a, b)) }}

  /// copy a (possibly foreign) BDD into this manager, preserving the
  /// function over identically numbered variables.
  pub fn copy(&self, bdd: &Bdd)->Bdd {
    if self.same_ptr(&bdd.mgr) { return bdd.clone() }
    let e = {
      let src = bdd.mgr.borrow();
      let mut dict = FxHashMap::default();
      let mut base = self.base_mut();
      base.maybe_gc();
      cofactor::copy_step(&mut base, &src, bdd.edge, &mut dict) };
    self.bdd(e) }

  /// restore a dumped BDD list.
  pub fn restore(&self, bytes: &[u8])->Result<Vec<Bdd>> {
    let edges = {
      let mut base = self.base_mut();
      base.maybe_gc();
      dump::restore(&mut base, bytes)? };
    Ok(edges.into_iter().map(|e| self.bdd(e)).collect()) }

  /// run a garbage collection now.
  pub fn gc(&self) { self.base_mut().garbage_collection(); }
  pub fn gc_limit(&self)->usize { self.base().gc_limit() }
  pub fn set_gc_limit(&self, limit: usize) { self.base_mut().set_gc_limit(limit); }
  pub fn enable_gc(&self) { self.base_mut().enable_gc(); }
  pub fn disable_gc(&self) { self.base_mut().disable_gc(); }

  /// dump several BDDs into one binary stream.
  pub fn dump_list(&self, w: &mut dyn std::io::Write, bdds: &[Bdd])->Result<()> {
    let edges: Vec<BddEdge> = bdds.iter().map(|b| {
      assert!(self.same_ptr(&b.mgr), "invalid argument: bdd from another manager");
      b.edge }).collect();
    dump::dump(&self.base(), w, &edges) }

  /// ITE over three handles of this manager.
  pub fn ite(&self, c: &Bdd, t: &Bdd, e: &Bdd)->Bdd {
    for b in [c, t, e] {
      assert!(self.same_ptr(&b.mgr), "invalid argument: bdd from another manager"); }
    let r = {
      let mut base = self.base_mut();
      base.maybe_gc();
      base.ite(c.edge, t.edge, e.edge) };
    self.bdd(r) }}


// -- value handles -------------------------------------------------------

/// A Boolean function owned by a [`BddMgr`]. Keeps its manager alive and
/// pins its root node for as long as it exists.
pub struct Bdd {
  pub(crate) mgr: Rc<RefCell<BddBase>>,
  pub(crate) edge: BddEdge,
}

impl Bdd {
  pub(crate) fn bind(mgr: Rc<RefCell<BddBase>>, edge: BddEdge)->Bdd {
    mgr.borrow_mut().inc_ref(edge);
    Bdd { mgr, edge }}

  pub(crate) fn derived(&self, edge: BddEdge)->Bdd { Bdd::bind(self.mgr.clone(), edge) }

  /// the owning manager.
  pub fn mgr(&self)->BddMgr { BddMgr { ptr: self.mgr.clone() }}

  pub(crate) fn check_mgr(&self, other: &Bdd) {
    assert!(Rc::ptr_eq(&self.mgr, &other.mgr),
            "invalid argument: operands belong to different managers"); }

  pub fn is_zero(&self)->bool { self.edge.is_zero() }
  pub fn is_one(&self)->bool { self.edge.is_one() }
  pub fn is_const(&self)->bool { self.edge.is_const() }
  /// the root edge's inversion flag.
  pub fn root_inv(&self)->bool { self.edge.inv() }

  pub fn invert(&self)->Bdd { self.derived(!self.edge) }

  pub fn and(&self, other: &Bdd)->Bdd {
    self.check_mgr(other);
    let e = { let mut b = self.mgr.borrow_mut(); b.maybe_gc(); b.and(self.edge, other.edge) };
    self.derived(e) }

  pub fn or(&self, other: &Bdd)->Bdd {
    self.check_mgr(other);
    let e = { let mut b = self.mgr.borrow_mut(); b.maybe_gc(); b.or(self.edge, other.edge) };
    self.derived(e) }

  pub fn xor(&self, other: &Bdd)->Bdd {
    self.check_mgr(other);
    let e = { let mut b = self.mgr.borrow_mut(); b.maybe_gc(); b.xor(self.edge, other.edge) };
    self.derived(e) }

  /// if-then-else with `self` as the condition.
  pub fn ite(&self, t: &Bdd, e: &Bdd)->Bdd {
    self.check_mgr(t);
    self.check_mgr(e);
    let r = { let mut b = self.mgr.borrow_mut(); b.maybe_gc();
              b.ite(self.edge, t.edge, e.edge) };
    self.derived(r) }

  /// the variable this function's root branches on.
  pub fn root_var(&self)->Option<BddVar> {
    if self.edge.is_const() { return None }
    let (var, _) = {
      let base = self.mgr.borrow();
      let level = base.level(self.edge);
      (base.level_to_var(level), level) };
    Some(self.mgr().variable(var as usize)) }

  /// the 0-branch of the root (with the root inverter applied).
  pub fn root_cofactor0(&self)->Bdd {
    if self.edge.is_const() { return self.clone() }
    let e = { let base = self.mgr.borrow(); base.branches(self.edge).0 };
    self.derived(e) }

  /// the 1-branch of the root (with the root inverter applied).
  pub fn root_cofactor1(&self)->Bdd {
    if self.edge.is_const() { return self.clone() }
    let e = { let base = self.mgr.borrow(); base.branches(self.edge).1 };
    self.derived(e) }

  /// evaluate under an assignment keyed by variable id.
  pub fn eval(&self, vals: &[bool])->bool { self.mgr.borrow().eval(self.edge, vals) }

  /// the number of nodes in this function's graph.
  pub fn size(&self)->usize {
    if self.edge.is_const() { return 0 }
    let base = self.mgr.borrow();
    let mut mark = fxhash::FxHashSet::default();
    fn dfs(base: &BddBase, e: BddEdge, mark: &mut fxhash::FxHashSet<u32>) {
      if e.is_const() { return }
      let id = e.node();
      if !mark.insert(id) { return }
      let node = base.node(id);
      dfs(base, node.e0, mark);
      dfs(base, node.e1, mark); }
    dfs(&base, self.edge, &mut mark);
    mark.len() }

  /// total node count of several graphs in one manager.
  pub fn size_list(bdds: &[Bdd])->usize {
    if bdds.is_empty() { return 0 }
    for b in bdds { bdds[0].check_mgr(b); }
    let base = bdds[0].mgr.borrow();
    let mut mark = fxhash::FxHashSet::default();
    fn dfs(base: &BddBase, e: BddEdge, mark: &mut fxhash::FxHashSet<u32>) {
      if e.is_const() { return }
      let id = e.node();
      if !mark.insert(id) { return }
      let node = base.node(id);
      dfs(base, node.e0, mark);
      dfs(base, node.e1, mark); }
    for b in bdds { dfs(&base, b.edge, &mut mark); }
    mark.len() }

  /// a stable hash mixing the manager identity and the root edge.
  pub fn hash(&self)->u64 {
    let m = Rc::as_ptr(&self.mgr) as u64;
    (m.wrapping_mul(m) >> 20).wrapping_add(self.edge.packed) }

  /// the truth table over `vars` (must cover the support).
  pub fn to_truth(&self, vars: &[BddVar])->Result<String> {
    let ids: Vec<u32> = vars.iter().map(|v| v.id).collect();
    self.mgr.borrow().to_truth(self.edge, &ids) }

  /// dump this single BDD to the binary stream format.
  pub fn dump(&self, w: &mut dyn std::io::Write)->Result<()> {
    dump::dump(&self.mgr.borrow(), w, &[self.edge]) }

  /// tabular listing of the graph.
  pub fn display(&self, w: &mut dyn fmt::Write)->fmt::Result {
    dump::display(&self.mgr.borrow(), w, &[self.edge]) }

  pub fn gen_dot(&self, w: &mut dyn fmt::Write, option: &JsonValue)->Result<()> {
    dump::gen_dot(&self.mgr.borrow(), w, &[self.edge], option) }}

impl Clone for Bdd {
  fn clone(&self)->Bdd { Bdd::bind(self.mgr.clone(), self.edge) }}

impl Drop for Bdd {
  fn drop(&mut self) { self.mgr.borrow_mut().dec_ref(self.edge); }}

impl PartialEq for Bdd {
  /// canonical: equal iff same manager and same root edge.
  fn eq(&self, other: &Bdd)->bool {
    Rc::ptr_eq(&self.mgr, &other.mgr) && self.edge == other.edge }}

impl Eq for Bdd {}

impl std::ops::Not for &Bdd {
  type Output = Bdd;
  fn not(self)->Bdd { self.invert() }}

impl std::ops::Not for Bdd {
  type Output = Bdd;
  fn not(self)->Bdd { self.invert() }}

impl std::ops::BitAnd for &Bdd {
  type Output = Bdd;
  fn bitand(self, rhs: &Bdd)->Bdd { self.and(rhs) }}

impl std::ops::BitOr for &Bdd {
  type Output = Bdd;
  fn bitor(self, rhs: &Bdd)->Bdd { self.or(rhs) }}

impl std::ops::BitXor for &Bdd {
  type Output = Bdd;
  fn bitxor(self, rhs: &Bdd)->Bdd { self.xor(rhs) }}

impl fmt::Debug for Bdd {
  fn fmt(&self, f: &mut fmt::Formatter)->fmt::Result {
    write!(f, "Bdd({:?})", self.edge) }}


// -- variables and literals ----------------------------------------------

/// A variable: an index into the manager's variable array. Its BDD is
/// the single-node function for that variable at its current level.
#[derive(Clone)]
pub struct BddVar {
  bdd: Bdd,
  id: u32,
}

impl BddVar {
  pub fn id(&self)->u32 { self.id }
  /// the variable's position in the current order.
  pub fn level(&self)->u32 { self.bdd.mgr.borrow().var_to_level(self.id) }
  pub fn bdd(&self)->Bdd { self.bdd.clone() }

  pub fn posi_literal(&self)->BddLit { BddLit { var: self.clone(), inv: false }}
  pub fn nega_literal(&self)->BddLit { BddLit { var: self.clone(), inv: true }}}

impl PartialEq for BddVar {
  fn eq(&self, other: &BddVar)->bool { self.bdd == other.bdd }}
impl Eq for BddVar {}

impl fmt::Debug for BddVar {
  fn fmt(&self, f: &mut fmt::Formatter)->fmt::Result { write!(f, "x{}", self.id) }}

/// A literal: a variable with a polarity.
#[derive(Clone, PartialEq, Eq)]
pub struct BddLit {
  var: BddVar,
  inv: bool,
}

impl BddLit {
  pub fn var(&self)->BddVar { self.var.clone() }
  pub fn inv(&self)->bool { self.inv }
  pub fn bdd(&self)->Bdd {
    if self.inv { self.var.bdd.invert() } else { self.var.bdd.clone() }}}

impl std::ops::Not for BddLit {
  type Output = BddLit;
  fn not(self)->BddLit { BddLit { var: self.var, inv: !self.inv }}}

impl fmt::Debug for BddLit {
  fn fmt(&self, f: &mut fmt::Formatter)->fmt::Result {
    write!(f, "x{}{}", self.var.id, if self.inv { "'" } else { "" }) }}


/// build a [`Lit`] list into a BDD cube (test helper shared with sop).
pub fn cube_from_lits(mgr: &BddMgr, lits: &[Lit])->Bdd {
  let mut cube = mgr.one();
  for l in lits {
    let v = mgr.variable(l.var() as usize);
    let b = if l.inv() { v.bdd().invert() } else { v.bdd() };
    cube = &cube & &b; }
  cube }


include!("test-bdd.rs");
