//! Cofactor, compose, and variable remapping.
use fxhash::FxHashMap;
use super::{Bdd, BddBase, BddEdge, BddLit, BddVar};

impl BddBase {
  /// restrict the variable at `level` to `val`.
  pub(crate) fn cofactor_level(&mut self, e: BddEdge, level: u32, val: bool)->BddEdge {
    let mut dict = FxHashMap::default();
    self.cofactor_level_step(e, level, val, &mut dict) }

  fn cofactor_level_step(&mut self, e: BddEdge, level: u32, val: bool,
                         dict: &mut FxHashMap<u32, BddEdge>)->BddEdge {
    if e.is_const() { return e }
    let oinv = e.inv();
    let id = e.node();
    let l = self.nodes[id as usize].level;
    if l > level { return e }
    if l == level {
      let node = self.nodes[id as usize];
      return (if val { node.e1 } else { node.e0 }).inv_if(oinv) }
    if let Some(&r) = dict.get(&id) { return r.inv_if(oinv) }
    let node = self.nodes[id as usize];
    let r0 = self.cofactor_level_step(node.e0, level, val, dict);
    let r1 = self.cofactor_level_step(node.e1, level, val, dict);
    let result = self.new_node(l, r0, r1);
    dict.insert(id, result);
    result.inv_if(oinv) }

  /// restrict by a cube: walk function and cube jointly by top level.
  pub(crate) fn cofactor_cube(&mut self, e: BddEdge, cube: BddEdge)->BddEdge {
    let mut dict = FxHashMap::default();
    self.cofactor_cube_step(e, cube, &mut dict) }

  fn cofactor_cube_step(&mut self, e: BddEdge, cube: BddEdge,
                        dict: &mut FxHashMap<(u64, u64), BddEdge>)->BddEdge {
    if e.is_const() { return e }
    if cube.is_zero() { return BddEdge::zero() }
    if cube.is_one() { return e }
    let oinv = e.inv();
    let e = e.positive();
    let key = (e.packed, cube.packed);
    if let Some(&r) = dict.get(&key) { return r.inv_if(oinv) }
    let level = self.level(e);
    let clevel = self.level(cube);
    let (c0, c1) = self.branches(cube);
    let result = if level == clevel {
      let (e0, e1) = self.branches(e);
      if c0.is_zero() { // positive literal in the cube
        let r = self.cofactor_cube_step(e1, c1, dict);
        r }
      else { // negative literal
        self.cofactor_cube_step(e0, c0, dict) }}
    else if level < clevel {
      let (e0, e1) = self.branches(e);
      let r0 = self.cofactor_cube_step(e0, cube, dict);
      let r1 = self.cofactor_cube_step(e1, cube, dict);
      self.new_node(level, r0, r1) }
    else { // the cube's variable is above everything in e: skip it
      let next = if c0.is_zero() { c1 } else { c0 };
      self.cofactor_cube_step(e, next, dict) };
    dict.insert(key, result);
    result.inv_if(oinv) }

  /// replace the variable at `level` with `cedge`.
  pub(crate) fn compose(&mut self, e: BddEdge, level: u32, cedge: BddEdge)->BddEdge {
    let mut dict = FxHashMap::default();
    self.compose_step(e, level, cedge, &mut dict) }

  fn compose_step(&mut self, e: BddEdge, level: u32, cedge: BddEdge,
                  dict: &mut FxHashMap<u32, BddEdge>)->BddEdge {
    if e.is_const() { return e }
    let id = e.node();
    let l = self.nodes[id as usize].level;
    if l > level { return e }
    let oinv = e.inv();
    if let Some(&r) = dict.get(&id) { return r.inv_if(oinv) }
    let node = self.nodes[id as usize];
    let r0 = self.compose_step(node.e0, level, cedge, dict);
    let r1 = self.compose_step(node.e1, level, cedge, dict);
    let result = if l == level { self.ite(cedge, r1, r0) }
                 else { self.new_node(l, r0, r1) };
    dict.insert(id, result);
    result.inv_if(oinv) }

  /// replace several variables at once; the replacement list is sorted
  /// by level and the function is walked once.
  pub(crate) fn multi_compose(&mut self, e: BddEdge, comp_list: &[(u32, BddEdge)])->BddEdge {
    if comp_list.is_empty() { return e }
    let mut list = comp_list.to_vec();
    list.sort_by_key(|&(level, _)| level);
    let mut dict = FxHashMap::default();
    self.multi_compose_step(e, &list, 0, &mut dict) }

  fn multi_compose_step(&mut self, e: BddEdge, list: &[(u32, BddEdge)], mut pos: usize,
                        dict: &mut FxHashMap<u32, BddEdge>)->BddEdge {
    if e.is_const() { return e }
    let id = e.node();
    let l = self.nodes[id as usize].level;
    while list[pos].0 < l {
      pos += 1;
      if pos == list.len() { return e }}
    let oinv = e.inv();
    if let Some(&r) = dict.get(&id) { return r.inv_if(oinv) }
    let node = self.nodes[id as usize];
    let clevel = list[pos].0;
    let result = if l < clevel {
      let r0 = self.multi_compose_step(node.e0, list, pos, dict);
      let r1 = self.multi_compose_step(node.e1, list, pos, dict);
      self.new_node(l, r0, r1) }
    else { // l == clevel
      let r0 = self.multi_compose_step(node.e0, list, pos + 1, dict);
      let r1 = self.multi_compose_step(node.e1, list, pos + 1, dict);
      let cedge = list[pos].1;
      self.ite(cedge, r1, r0) };
    dict.insert(id, result);
    result.inv_if(oinv) }}

/// structural copy across managers: rebuild by variable id so the copy
/// represents the same function even under a different order.
pub(crate) fn copy_step(dst: &mut BddBase, src: &BddBase, e: BddEdge,
                        dict: &mut FxHashMap<u32, BddEdge>)->BddEdge {
  if e.is_const() { return e }
  let oinv = e.inv();
  let id = e.node();
  if let Some(&r) = dict.get(&id) { return r.inv_if(oinv) }
  let node = src.nodes[id as usize];
  let var = src.level_to_var(node.level);
  let r0 = copy_step(dst, src, node.e0, dict);
  let r1 = copy_step(dst, src, node.e1, dict);
  let vedge = dst.variable(var as usize);
  let result = dst.ite(vedge, r1, r0);
  dict.insert(id, result);
  result.inv_if(oinv) }


impl Bdd {
  /// the cofactor with `var` fixed to `!inv`.
  pub fn cofactor_var(&self, var: &BddVar, inv: bool)->Bdd {
    self.check_mgr(&var.bdd());
    let e = {
      let mut base = self.mgr.borrow_mut();
      base.maybe_gc();
      let level = base.var_to_level(var.id());
      base.cofactor_level(self.edge, level, !inv) };
    self.derived(e) }

  /// the cofactor with the literal's variable fixed to make the literal
  /// true.
  pub fn cofactor_lit(&self, lit: &BddLit)->Bdd {
    self.cofactor_var(&lit.var(), lit.inv()) }

  /// the cofactor by a cube of literals.
  pub fn cofactor_cube(&self, cube: &Bdd)->Bdd {
    self.check_mgr(cube);
    assert!(cube.is_cube(), "invalid argument: cofactor_cube needs a cube");
    let e = {
      let mut base = self.mgr.borrow_mut();
      base.maybe_gc();
      base.cofactor_cube(self.edge, cube.edge) };
    self.derived(e) }

  /// substitute `g` for `var`.
  pub fn compose(&self, var: &BddVar, g: &Bdd)->Bdd {
    self.check_mgr(g);
    self.check_mgr(&var.bdd());
    let e = {
      let mut base = self.mgr.borrow_mut();
      base.maybe_gc();
      let level = base.var_to_level(var.id());
      base.compose(self.edge, level, g.edge) };
    self.derived(e) }

  /// substitute several variables simultaneously.
  pub fn multi_compose(&self, map: &[(BddVar, Bdd)])->Bdd {
    for (v, g) in map {
      self.check_mgr(&v.bdd());
      self.check_mgr(g); }
    let e = {
      let mut base = self.mgr.borrow_mut();
      base.maybe_gc();
      let list: Vec<(u32, BddEdge)> = map.iter()
        .map(|(v, g)| (base.var_to_level(v.id()), g.edge)).collect();
      base.multi_compose(self.edge, &list) };
    self.derived(e) }

  /// rename variables: multi-compose restricted to literal targets.
  pub fn remap_vars(&self, map: &[(BddVar, BddLit)])->Bdd {
    let map2: Vec<(BddVar, Bdd)> = map.iter()
      .map(|(v, l)| (v.clone(), l.bdd())).collect();
    self.multi_compose(&map2) }}
