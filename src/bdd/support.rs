//! Support sets, cube predicates, paths, and cross-manager identity.
use std::fmt;
use fxhash::FxHashMap;
use super::{Bdd, BddBase, BddEdge, BddLit, BddMgr, BddVar};

impl BddBase {
  /// the support of `e` as a positive cube.
  pub(crate) fn support(&mut self, e: BddEdge)->BddEdge {
    let mut dict = FxHashMap::default();
    self.support_step(e, &mut dict) }

  fn support_step(&mut self, e: BddEdge, dict: &mut FxHashMap<u32, BddEdge>)->BddEdge {
    if e.is_const() { return BddEdge::one() }
    let id = e.node();
    if let Some(&r) = dict.get(&id) { return r }
    let node = self.nodes[id as usize];
    let r0 = self.support_step(node.e0, dict);
    let r1 = self.support_step(node.e1, dict);
    let sub = self.support_cup(r0, r1);
    let result = self.new_node(node.level, BddEdge::zero(), sub);
    dict.insert(id, result);
    result }

  /// union of two positive cubes.
  pub(crate) fn support_cup(&mut self, e0: BddEdge, e1: BddEdge)->BddEdge {
    if e0.is_one() { return e1 }
    if e1.is_one() { return e0 }
    let l0 = self.level(e0);
    let l1 = self.level(e1);
    let (n0, n1) = (self.nodes[e0.node() as usize], self.nodes[e1.node() as usize]);
    if l0 < l1 {
      let sub = self.support_cup(n0.e1, e1);
      self.new_node(l0, BddEdge::zero(), sub) }
    else if l0 == l1 {
      let sub = self.support_cup(n0.e1, n1.e1);
      self.new_node(l0, BddEdge::zero(), sub) }
    else {
      let sub = self.support_cup(e0, n1.e1);
      self.new_node(l1, BddEdge::zero(), sub) }}

  /// intersection of two positive cubes.
  pub(crate) fn support_cap(&mut self, e0: BddEdge, e1: BddEdge)->BddEdge {
    if e0.is_one() || e1.is_one() { return BddEdge::one() }
    let l0 = self.level(e0);
    let l1 = self.level(e1);
    let (n0, n1) = (self.nodes[e0.node() as usize], self.nodes[e1.node() as usize]);
    if l0 < l1 { self.support_cap(n0.e1, e1) }
    else if l0 == l1 {
      let sub = self.support_cap(n0.e1, n1.e1);
      self.new_node(l0, BddEdge::zero(), sub) }
    else { self.support_cap(e0, n1.e1) }}

  /// difference of two positive cubes.
  pub(crate) fn support_diff(&mut self, e0: BddEdge, e1: BddEdge)->BddEdge {
    if e0.is_one() { return BddEdge::one() }
    if e1.is_one() { return e0 }
    let l0 = self.level(e0);
    let l1 = self.level(e1);
    let (n0, n1) = (self.nodes[e0.node() as usize], self.nodes[e1.node() as usize]);
    if l0 < l1 {
      let sub = self.support_diff(n0.e1, e1);
      self.new_node(l0, BddEdge::zero(), sub) }
    else if l0 == l1 { self.support_diff(n0.e1, n1.e1) }
    else { self.support_diff(e0, n1.e1) }}

  /// does `e` depend on the variable at `level`?
  pub(crate) fn check_sup(&self, e: BddEdge, level: u32)->bool {
    let mut dict = FxHashMap::default();
    self.check_sup_step(e, level, &mut dict) }

  fn check_sup_step(&self, e: BddEdge, level: u32,
                    dict: &mut FxHashMap<u32, bool>)->bool {
    if e.is_const() { return false }
    let id = e.node();
    let l = self.nodes[id as usize].level;
    if l == level { return true }
    if l > level { return false }
    if let Some(&r) = dict.get(&id) { return r }
    let node = self.nodes[id as usize];
    let ans = self.check_sup_step(node.e0, level, dict)
           || self.check_sup_step(node.e1, level, dict);
    dict.insert(id, ans);
    ans }

  /// are the variables at `level1 < level2` symmetric in `e` (with the
  /// inverting pairing when `inv`)?
  pub(crate) fn check_sym(&self, e: BddEdge, level1: u32, level2: u32, inv: bool)->bool {
    let mut dict1 = FxHashMap::default();
    let mut dict2 = FxHashMap::default();
    self.sym_step(e, level1, level2, inv, &mut dict1, &mut dict2) }

  fn sym_step(&self, e: BddEdge, l1: u32, l2: u32, inv: bool,
              dict1: &mut FxHashMap<u32, bool>,
              dict2: &mut FxHashMap<(u64, u64), bool>)->bool {
    if e.is_const() { return true }
    let id = e.node();
    if let Some(&r) = dict1.get(&id) { return r }
    let node = self.nodes[id as usize];
    let l = node.level;
    let ans = if l < l1 {
      self.sym_step(node.e0, l1, l2, inv, dict1, dict2)
        && self.sym_step(node.e1, l1, l2, inv, dict1, dict2) }
    else if l == l1 {
      self.sym_step2(node.e0, node.e1, l2, inv, dict2) }
    else if l < l2 {
      // does not depend on l1; must not depend on l2 either.
      !self.check_sup(BddEdge::new(id, false), l2) }
    else if l == l2 { false }
    else { true };
    dict1.insert(id, ans);
    ans }

  /// walk the two cofactors at the first level in lockstep down to the
  /// second level and compare the cross branches.
  fn sym_step2(&self, e0: BddEdge, e1: BddEdge, l2: u32, inv: bool,
               dict2: &mut FxHashMap<(u64, u64), bool>)->bool {
    if e0 == e1 {
      // equal cofactors: symmetric iff neither depends on the second
      // variable.
      return !self.check_sup(e0, l2) }
    if e0.is_const() && e1.is_const() { return false }
    let key = (e0.packed, e1.packed);
    if let Some(&r) = dict2.get(&key) { return r }
    let (top, a0, a1, b0, b1) = self.decomp(e0, e1);
    let ans = if top < l2 {
      self.sym_step2(a0, b0, l2, inv, dict2) && self.sym_step2(a1, b1, l2, inv, dict2) }
    else if top == l2 {
      if inv { a0 == b1 } else { a1 == b0 }}
    else {
      // both sides are below the second variable and distinct.
      false };
    dict2.insert(key, ans);
    ans }

  /// one satisfying cube.
  pub(crate) fn onepath(&mut self, e: BddEdge)->BddEdge {
    if e.is_zero() { return BddEdge::zero() }
    if e.is_one() { return BddEdge::one() }
    let (e0, e1) = self.branches(e);
    let level = self.level(e);
    if !e1.is_zero() {
      let sub = self.onepath(e1);
      self.new_node(level, BddEdge::zero(), sub) }
    else {
      let sub = self.onepath(e0);
      self.new_node(level, sub, BddEdge::zero()) }}}

/// cross-manager structural identity: same function iff the level-labeled
/// graphs match.
pub(crate) fn ident_step(a_base: &BddBase, a: BddEdge, b_base: &BddBase, b: BddEdge,
                         dict: &mut FxHashMap<(u64, u64), bool>)->bool {
  if a.is_const() { return a == b }
  if b.is_const() { return false }
  if a.inv() != b.inv() { return false }
  let key = (a.packed, b.packed);
  if let Some(&r) = dict.get(&key) { return r }
  let an = a_base.nodes[a.node() as usize];
  let bn = b_base.nodes[b.node() as usize];
  let ans = an.level == bn.level
    && ident_step(a_base, an.e0, b_base, bn.e0, dict)
    && ident_step(a_base, an.e1, b_base, bn.e1, dict);
  dict.insert(key, ans);
  ans }


impl Bdd {
  /// is this a conjunction of literals?
  pub fn is_cube(&self)->bool {
    let base = self.mgr.borrow();
    let mut e = self.edge;
    if e.is_zero() { return false }
    while !e.is_one() {
      if e.is_zero() { return false }
      let (e0, e1) = base.branches(e);
      if e0.is_zero() { e = e1; }
      else if e1.is_zero() { e = e0; }
      else { return false }}
    true }

  /// is this a conjunction of positive literals?
  pub fn is_posicube(&self)->bool {
    let base = self.mgr.borrow();
    let mut e = self.edge;
    if e.is_zero() { return false }
    while !e.is_one() {
      let (e0, e1) = base.branches(e);
      if !e0.is_zero() { return false }
      e = e1; }
    true }

  /// is this exactly one positive variable?
  pub fn is_variable(&self)->bool {
    if self.edge.is_const() || self.edge.inv() { return false }
    let base = self.mgr.borrow();
    let (e0, e1) = base.branches(self.edge);
    e0.is_zero() && e1.is_one() }

  /// is this a single literal (a variable or its negation)?
  pub fn is_literal(&self)->bool {
    if self.edge.is_const() { return false }
    let base = self.mgr.borrow();
    let (e0, e1) = base.branches(self.edge);
    (e0.is_zero() && e1.is_one()) || (e0.is_one() && e1.is_zero()) }

  /// the support as a var-set (a positive cube).
  pub fn support(&self)->BddVarSet {
    let e = { let mut base = self.mgr.borrow_mut(); base.maybe_gc(); base.support(self.edge) };
    BddVarSet { bdd: self.derived(e) }}

  pub fn support_size(&self)->usize { self.support().len() }

  /// does the function depend on `var`?
  pub fn check_sup(&self, var: &BddVar)->bool {
    self.check_mgr(&var.bdd());
    let base = self.mgr.borrow();
    let level = base.var_to_level(var.id());
    base.check_sup(self.edge, level) }

  /// are `var1` and `var2` symmetric (inverting pairing when `inv`)?
  pub fn check_sym(&self, var1: &BddVar, var2: &BddVar, inv: bool)->bool {
    self.check_mgr(&var1.bdd());
    self.check_mgr(&var2.bdd());
    let base = self.mgr.borrow();
    let mut l1 = base.var_to_level(var1.id());
    let mut l2 = base.var_to_level(var2.id());
    if l1 == l2 { return true }
    if l1 > l2 { std::mem::swap(&mut l1, &mut l2); }
    base.check_sym(self.edge, l1, l2, inv) }

  /// one satisfying cube, or the zero function.
  pub fn get_onepath(&self)->Bdd {
    let e = { let mut base = self.mgr.borrow_mut(); base.maybe_gc(); base.onepath(self.edge) };
    self.derived(e) }

  /// one falsifying cube, or the zero function.
  pub fn get_zeropath(&self)->Bdd { self.invert().get_onepath() }

  /// the literals of a cube, top variable first.
  pub fn to_litlist(&self)->Vec<BddLit> {
    assert!(self.is_cube(), "invalid argument: to_litlist needs a cube");
    let lits: Vec<(u32, bool)> = {
      let base = self.mgr.borrow();
      let mut list = vec![];
      let mut e = self.edge;
      while !e.is_const() {
        let (e0, e1) = base.branches(e);
        let var = base.level_to_var(base.level(e));
        if e0.is_zero() { list.push((var, false)); e = e1; }
        else { list.push((var, true)); e = e0; }}
      list };
    let mgr = self.mgr();
    lits.into_iter()
      .map(|(var, inv)| {
        let v = mgr.variable(var as usize);
        if inv { v.nega_literal() } else { v.posi_literal() }})
      .collect() }

  /// the same function in another manager, or this manager's own root
  /// comparison: true iff the two BDDs represent the same function.
  pub fn is_identical(&self, other: &Bdd)->bool {
    if std::rc::Rc::ptr_eq(&self.mgr, &other.mgr) { return self.edge == other.edge }
    let a = self.mgr.borrow();
    let b = other.mgr.borrow();
    let mut dict = FxHashMap::default();
    ident_step(&a, self.edge, &b, other.edge, &mut dict) }}


// -- var sets ------------------------------------------------------------

/// A set of variables, represented as a positive cube.
#[derive(Clone)]
pub struct BddVarSet { pub(crate) bdd: Bdd }

impl BddVarSet {
  /// an empty set.
  pub fn empty(mgr: &BddMgr)->BddVarSet { BddVarSet { bdd: mgr.one() }}

  /// build from a variable list.
  pub fn from_vars(vars: &[BddVar])->BddVarSet {
    assert!(!vars.is_empty(), "invalid argument: from_vars needs at least one variable");
    let mgr = vars[0].bdd().mgr();
    let mut set = BddVarSet::empty(&mgr);
    for v in vars { set = set.cup(&BddVarSet { bdd: v.bdd() }); }
    set }

  /// the underlying cube.
  pub fn bdd(&self)->Bdd { self.bdd.clone() }

  pub fn len(&self)->usize {
    let base = self.bdd.mgr.borrow();
    let mut n = 0;
    let mut e = self.bdd.edge;
    while !e.is_const() {
      n += 1;
      e = base.nodes[e.node() as usize].e1; }
    n }

  pub fn is_empty(&self)->bool { self.bdd.edge.is_one() }

  /// set union.
  pub fn cup(&self, other: &BddVarSet)->BddVarSet {
    self.bdd.check_mgr(&other.bdd);
    let e = { let mut base = self.bdd.mgr.borrow_mut();
              base.support_cup(self.bdd.edge, other.bdd.edge) };
    BddVarSet { bdd: self.bdd.derived(e) }}

  /// set intersection.
  pub fn cap(&self, other: &BddVarSet)->BddVarSet {
    self.bdd.check_mgr(&other.bdd);
    let e = { let mut base = self.bdd.mgr.borrow_mut();
              base.support_cap(self.bdd.edge, other.bdd.edge) };
    BddVarSet { bdd: self.bdd.derived(e) }}

  /// set difference.
  pub fn diff(&self, other: &BddVarSet)->BddVarSet {
    self.bdd.check_mgr(&other.bdd);
    let e = { let mut base = self.bdd.mgr.borrow_mut();
              base.support_diff(self.bdd.edge, other.bdd.edge) };
    BddVarSet { bdd: self.bdd.derived(e) }}

  /// do the two sets share a variable?
  pub fn check_intersect(&self, other: &BddVarSet)->bool {
    self.bdd.check_mgr(&other.bdd);
    let base = self.bdd.mgr.borrow();
    let mut e1 = self.bdd.edge;
    let mut e2 = other.bdd.edge;
    while !e1.is_one() && !e2.is_one() {
      let l1 = base.level(e1);
      let l2 = base.level(e2);
      if l1 == l2 { return true }
      if l1 < l2 { e1 = base.nodes[e1.node() as usize].e1; }
      else { e2 = base.nodes[e2.node() as usize].e1; }}
    false }

  /// the member variables, topmost first.
  pub fn to_varlist(&self)->Vec<BddVar> {
    let ids: Vec<u32> = {
      let base = self.bdd.mgr.borrow();
      let mut list = vec![];
      let mut e = self.bdd.edge;
      while !e.is_const() {
        list.push(base.level_to_var(base.level(e)));
        e = base.nodes[e.node() as usize].e1; }
      list };
    let mgr = self.bdd.mgr();
    ids.into_iter().map(|v| mgr.variable(v as usize)).collect() }}

impl PartialEq for BddVarSet {
  fn eq(&self, other: &BddVarSet)->bool { self.bdd == other.bdd }}
impl Eq for BddVarSet {}

impl std::ops::Add for &BddVarSet {
  type Output = BddVarSet;
  fn add(self, rhs: &BddVarSet)->BddVarSet { self.cup(rhs) }}

impl std::ops::Sub for &BddVarSet {
  type Output = BddVarSet;
  fn sub(self, rhs: &BddVarSet)->BddVarSet { self.diff(rhs) }}

impl std::ops::BitAnd for &BddVarSet {
  type Output = BddVarSet;
  fn bitand(self, rhs: &BddVarSet)->BddVarSet { self.cap(rhs) }}

impl fmt::Debug for BddVarSet {
  fn fmt(&self, f: &mut fmt::Formatter)->fmt::Result {
    write!(f, "{{")?;
    for (i, v) in self.to_varlist().iter().enumerate() {
      if i > 0 { write!(f, ", ")?; }
      write!(f, "{:?}", v)?; }
    write!(f, "}}") }}
