//! Cube covers and their algebra.
use std::fmt;
use crate::expr::Expr;
use crate::lit::Lit;
use super::{block_pos, cube_size, get_pat, lit_mask, var_mask, word_literal_num,
            SopCube, MASK_N, MASK_P};

/// A set of cubes over a fixed variable count. The body is one
/// contiguous bitvector, cubes in strictly descending order with no
/// duplicates.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SopCover {
  nv: usize,
  ncubes: usize,
  body: Vec<u64>,
}

impl SopCover {
  /// the empty cover (constant 0).
  pub fn new(variable_num: usize)->SopCover {
    SopCover { nv: variable_num, ncubes: 0, body: vec![] }}

  /// the tautology cover: a single universal cube.
  pub fn tautology(variable_num: usize)->SopCover {
    SopCover { nv: variable_num, ncubes: 1, body: vec![0; cube_size(variable_num)] }}

  /// build from cubes; sorts and drops duplicates.
  pub fn from_cubes(variable_num: usize, cubes: &[SopCube])->SopCover {
    let cs = cube_size(variable_num);
    let mut body = Vec::with_capacity(cubes.len() * cs);
    for cube in cubes {
      assert!(cube.variable_num() == variable_num,
              "invalid argument: variable_num() is different from each other");
      body.extend_from_slice(cube.body()); }
    Self::from_raw(variable_num, cubes.len(), body) }

  /// build from literal lists, one per cube.
  pub fn from_lits(variable_num: usize, cube_list: &[Vec<Lit>])->SopCover {
    let cubes: Vec<SopCube> = cube_list.iter()
      .map(|lits| SopCube::from_lits(variable_num, lits))
      .collect();
    SopCover::from_cubes(variable_num, &cubes) }

  /// a cover holding one cube.
  pub fn from_cube(cube: &SopCube)->SopCover {
    SopCover::from_cubes(cube.variable_num(), std::slice::from_ref(cube)) }

  fn from_raw(nv: usize, ncubes: usize, mut body: Vec<u64>)->SopCover {
    let cs = cube_size(nv);
    let mut ctx = SortCtx { cs, scratch: vec![] };
    ctx.sort(&mut body, 0, ncubes);
    let ncubes = dedup(&mut body, cs, ncubes);
    body.truncate(ncubes * cs);
    SopCover { nv, ncubes, body }}

  pub fn variable_num(&self)->usize { self.nv }
  pub fn cube_num(&self)->usize { self.ncubes }
  fn cs(&self)->usize { cube_size(self.nv) }

  pub fn get_cube(&self, i: usize)->SopCube {
    assert!(i < self.ncubes, "out of range: cube index {} >= {}", i, self.ncubes);
    let cs = self.cs();
    SopCube::from_body(self.nv, self.body[i * cs..(i + 1) * cs].to_vec()) }

  fn cube_at(&self, i: usize)->&[u64] {
    let cs = self.cs();
    &self.body[i * cs..(i + 1) * cs] }

  pub fn literal_num(&self)->usize {
    self.body.iter().map(|&w| word_literal_num(w)).sum() }

  /// occurrences of one literal across the cover.
  pub fn literal_num_lit(&self, lit: Lit)->usize {
    let blk = block_pos(lit.var() as usize);
    let mask = lit_mask(lit);
    (0..self.ncubes).filter(|&i| self.cube_at(i)[blk] & mask == mask).count() }

  pub fn literal_list(&self)->Vec<Vec<Lit>> {
    (0..self.ncubes).map(|i| self.get_cube(i).literal_list()).collect() }

  fn check_nv(&self, nv: usize) {
    assert!(self.nv == nv,
            "invalid argument: variable_num() is different from each other"); }

  // -- set operations over the sorted cube lists --

  /// cube-set union.
  pub fn sum(&self, other: &SopCover)->SopCover {
    self.check_nv(other.nv);
    let cs = self.cs();
    let mut body = Vec::with_capacity((self.ncubes + other.ncubes) * cs);
    let (mut i, mut j) = (0, 0);
    let mut nc = 0;
    while i < self.ncubes && j < other.ncubes {
      match self.cube_at(i).cmp(other.cube_at(j)) {
        std::cmp::Ordering::Greater => { body.extend_from_slice(self.cube_at(i)); i += 1; }
        std::cmp::Ordering::Less => { body.extend_from_slice(other.cube_at(j)); j += 1; }
        std::cmp::Ordering::Equal => {
          body.extend_from_slice(self.cube_at(i));
          i += 1;
          j += 1; }}
      nc += 1; }
    while i < self.ncubes { body.extend_from_slice(self.cube_at(i)); i += 1; nc += 1; }
    while j < other.ncubes { body.extend_from_slice(other.cube_at(j)); j += 1; nc += 1; }
    SopCover { nv: self.nv, ncubes: nc, body }}

  /// cube-set difference.
  pub fn diff(&self, other: &SopCover)->SopCover {
    self.check_nv(other.nv);
    let cs = self.cs();
    let mut body = Vec::with_capacity(self.ncubes * cs);
    let (mut i, mut j) = (0, 0);
    let mut nc = 0;
    while i < self.ncubes && j < other.ncubes {
      match self.cube_at(i).cmp(other.cube_at(j)) {
        std::cmp::Ordering::Greater => {
          body.extend_from_slice(self.cube_at(i));
          i += 1;
          nc += 1; }
        std::cmp::Ordering::Less => { j += 1; }
        std::cmp::Ordering::Equal => { i += 1; j += 1; }}}
    while i < self.ncubes { body.extend_from_slice(self.cube_at(i)); i += 1; nc += 1; }
    SopCover { nv: self.nv, ncubes: nc, body }}

  /// pairwise cube products, empties discarded.
  pub fn product(&self, other: &SopCover)->SopCover {
    self.check_nv(other.nv);
    let cs = self.cs();
    let mut body = Vec::with_capacity(self.ncubes * other.ncubes * cs);
    let mut nc = 0;
    for i in 0..self.ncubes {
      'pair: for j in 0..other.ncubes {
        let base = body.len();
        body.resize(base + cs, 0);
        for k in 0..cs {
          let tmp = self.cube_at(i)[k] | other.cube_at(j)[k];
          if (tmp & MASK_P) & ((tmp & MASK_N) >> 1) != 0 {
            body.truncate(base);
            continue 'pair }
          body[base + k] = tmp; }
        nc += 1; }}
    SopCover::from_raw(self.nv, nc, body) }

  /// product with one cube.
  pub fn product_cube(&self, cube: &SopCube)->SopCover {
    self.check_nv(cube.variable_num());
    self.product(&SopCover::from_cube(cube)) }

  /// product with one literal.
  pub fn product_lit(&self, lit: Lit)->SopCover {
    let blk = block_pos(lit.var() as usize);
    let mask = lit_mask(lit);
    let nmask = lit_mask(!lit);
    let cs = self.cs();
    let mut body = Vec::with_capacity(self.body.len());
    let mut nc = 0;
    for i in 0..self.ncubes {
      let cube = self.cube_at(i);
      if cube[blk] & nmask != 0 { continue }  // conflicting literal
      let base = body.len();
      body.extend_from_slice(cube);
      body[base + blk] |= mask;
      nc += 1; }
    SopCover::from_raw(self.nv, nc, body) }

  /// algebraic division by a cover: a quotient cube must divide every
  /// divisor cube once. A divisor with no cubes yields the empty cover.
  pub fn quotient(&self, other: &SopCover)->SopCover {
    self.check_nv(other.nv);
    let cs = self.cs();
    let nc1 = self.ncubes;
    let nc2 = other.ncubes;
    // per dividend cube: the first successful quotient.
    let mut tmp: Vec<u64> = vec![0; nc1 * cs];
    let mut mark = vec![false; nc1];
    for i in 0..nc1 {
      'div: for j in 0..nc2 {
        for k in 0..cs {
          let (a, b) = (self.cube_at(i)[k], other.cube_at(j)[k]);
          if !a & b != 0 { continue 'div }}
        for k in 0..cs {
          tmp[i * cs + k] = self.cube_at(i)[k] & !other.cube_at(j)[k]; }
        mark[i] = true;
        break; }}
    // a quotient counts when it shows up once per divisor cube.
    let mut body = vec![];
    let mut nc = 0;
    for i in 0..nc1 {
      if !mark[i] { continue }
      let mut c = 1;
      let mut matches = vec![];
      for i2 in (i + 1)..nc1 {
        if mark[i2] && tmp[i * cs..(i + 1) * cs] == tmp[i2 * cs..(i2 + 1) * cs] {
          c += 1;
          matches.push(i2); }}
      if c == nc2 {
        body.extend_from_slice(&tmp[i * cs..(i + 1) * cs]);
        nc += 1;
        for m in matches { mark[m] = false; }}}
    SopCover::from_raw(self.nv, nc, body) }

  /// division by one cube.
  pub fn quotient_cube(&self, cube: &SopCube)->SopCover {
    self.check_nv(cube.variable_num());
    let cs = self.cs();
    let mut body = vec![];
    let mut nc = 0;
    'next: for i in 0..self.ncubes {
      let base = body.len();
      for k in 0..cs {
        let (a, b) = (self.cube_at(i)[k], cube.body()[k]);
        if !a & b != 0 { body.truncate(base); continue 'next }}
      for k in 0..cs { body.push(self.cube_at(i)[k] & !cube.body()[k]); }
      nc += 1; }
    SopCover { nv: self.nv, ncubes: nc, body }}

  /// division by one literal.
  pub fn quotient_lit(&self, lit: Lit)->SopCover {
    let blk = block_pos(lit.var() as usize);
    let mask = lit_mask(lit);
    let vmask = var_mask(lit.var() as usize);
    let cs = self.cs();
    let mut body = vec![];
    let mut nc = 0;
    for i in 0..self.ncubes {
      let cube = self.cube_at(i);
      if cube[blk] & vmask != mask { continue }
      let base = body.len();
      body.extend_from_slice(cube);
      body[base + blk] &= !vmask;
      nc += 1; }
    SopCover { nv: self.nv, ncubes: nc, body }}

  /// the cofactor: drop cubes with the opposing literal, erase the
  /// variable from the rest.
  pub fn cofactor(&self, lit: Lit)->SopCover {
    let blk = block_pos(lit.var() as usize);
    let nmask = lit_mask(!lit);
    let vmask = var_mask(lit.var() as usize);
    let cs = self.cs();
    let mut body = vec![];
    let mut nc = 0;
    for i in 0..self.ncubes {
      let cube = self.cube_at(i);
      if cube[blk] & nmask != 0 { continue }
      let base = body.len();
      body.extend_from_slice(cube);
      body[base + blk] &= !vmask;
      nc += 1; }
    SopCover::from_raw(self.nv, nc, body) }

  /// the word-wise intersection of every cube.
  pub fn common_cube(&self)->SopCube {
    let cs = self.cs();
    let mut body = vec![0u64; cs];
    if self.ncubes > 0 {
      body.copy_from_slice(self.cube_at(0));
      for i in 1..self.ncubes {
        let mut any = 0u64;
        for k in 0..cs {
          body[k] &= self.cube_at(i)[k];
          any |= body[k]; }
        if any == 0 { break }}}
    SopCube::from_body(self.nv, body) }

  /// the complement cover, by recursive Shannon expansion.
  pub fn complement(&self)->SopCover {
    if self.ncubes == 0 { return SopCover::tautology(self.nv) }
    if self.ncubes == 1 { return self.get_cube(0).complement() }
    // a universal cube makes the whole cover a tautology.
    for i in 0..self.ncubes {
      if self.cube_at(i).iter().all(|&w| w == 0) { return SopCover::new(self.nv) }}

    let cc = self.common_cube();
    let (src, r) = if cc.is_universal() {
      (self.clone(), SopCover::new(self.nv)) }
    else {
      (self.quotient_cube(&cc), cc.complement()) };

    let j = src.split_var();
    let f0 = src.cofactor(Lit::negative(j as u32));
    let f1 = src.cofactor(Lit::positive(j as u32));
    let f0c = f0.complement();
    let f1c = f1.complement();
    let merged = merge_shannon(self.nv, j, &f0c, &f1c);
    merged.sum(&r) }

  /// the most binate variable; for a unate cover, the most used one.
  fn split_var(&self)->usize {
    let mut p = vec![0usize; self.nv];
    let mut n = vec![0usize; self.nv];
    for i in 0..self.ncubes {
      let cube = self.cube_at(i);
      for v in 0..self.nv {
        match get_pat(cube, v) {
          1 => p[v] += 1,
          2 => n[v] += 1,
          _ => {} }}}
    let mut best = None;
    let mut best_c = 0;
    for v in 0..self.nv {
      let c = p[v].min(n[v]);
      if c > best_c { best_c = c; best = Some(v); }}
    if let Some(v) = best { return v }
    // unate: fall back to the most used variable.
    (0..self.nv).max_by_key(|&v| p[v] + n[v])
      .expect("logic error: complement on a cover with no variables") }

  /// lexicographic compare cube by cube.
  pub fn compare(&self, other: &SopCover)->std::cmp::Ordering {
    self.check_nv(other.nv);
    let n = self.ncubes.min(other.ncubes);
    for i in 0..n {
      let ord = self.cube_at(i).cmp(other.cube_at(i));
      if ord != std::cmp::Ordering::Equal { return ord }}
    self.ncubes.cmp(&other.ncubes) }

  /// a 16-bit fold of the packed words; the sort order makes it
  /// insensitive to construction order.
  pub fn hash(&self)->u64 {
    let mut ans: u64 = 0;
    for &w in &self.body {
      let mut w = w;
      for _ in 0..4 { ans ^= w & 0xffff; w >>= 16; }}
    ans }

  pub fn to_expr(&self)->Expr {
    let mut e = Expr::zero();
    for i in 0..self.ncubes { e = e | self.get_cube(i).to_expr(); }
    e }

  /// evaluate under an assignment keyed by variable id.
  pub fn eval(&self, vals: &[bool])->bool {
    (0..self.ncubes).any(|i| self.get_cube(i).eval(vals)) }}

/// Shannon merge: `x'·f0c + x·f1c + (f0c ∩ f1c)`, with the common part
/// factored out of both cofactor complements.
fn merge_shannon(nv: usize, var: usize, f0c: &SopCover, f1c: &SopCover)->SopCover {
  let mut only0 = vec![];
  let mut only1 = vec![];
  let mut both = vec![];
  let (mut i, mut j) = (0, 0);
  while i < f0c.ncubes && j < f1c.ncubes {
    match f0c.cube_at(i).cmp(f1c.cube_at(j)) {
      std::cmp::Ordering::Greater => { only0.push(i); i += 1; }
      std::cmp::Ordering::Less => { only1.push(j); j += 1; }
      std::cmp::Ordering::Equal => { both.push(i); i += 1; j += 1; }}}
  while i < f0c.ncubes { only0.push(i); i += 1; }
  while j < f1c.ncubes { only1.push(j); j += 1; }

  let blk = block_pos(var);
  let mut body = vec![];
  let mut nc = 0;
  for &pos in &only0 {
    let base = body.len();
    body.extend_from_slice(f0c.cube_at(pos));
    body[base + blk] |= lit_mask(Lit::negative(var as u32));
    nc += 1; }
  for &pos in &only1 {
    let base = body.len();
    body.extend_from_slice(f1c.cube_at(pos));
    body[base + blk] |= lit_mask(Lit::positive(var as u32));
    nc += 1; }
  for &pos in &both {
    body.extend_from_slice(f0c.cube_at(pos));
    nc += 1; }
  SopCover::from_raw(nv, nc, body) }

// -- operator sugar ------------------------------------------------------

impl std::ops::Add for &SopCover {
  type Output = SopCover;
  fn add(self, rhs: &SopCover)->SopCover { self.sum(rhs) }}

impl std::ops::Sub for &SopCover {
  type Output = SopCover;
  fn sub(self, rhs: &SopCover)->SopCover { self.diff(rhs) }}

impl std::ops::Mul for &SopCover {
  type Output = SopCover;
  fn mul(self, rhs: &SopCover)->SopCover { self.product(rhs) }}

impl std::ops::Mul<&SopCube> for &SopCover {
  type Output = SopCover;
  fn mul(self, rhs: &SopCube)->SopCover { self.product_cube(rhs) }}

impl std::ops::Mul<Lit> for &SopCover {
  type Output = SopCover;
  fn mul(self, rhs: Lit)->SopCover { self.product_lit(rhs) }}

impl std::ops::Div for &SopCover {
  type Output = SopCover;
  fn div(self, rhs: &SopCover)->SopCover { self.quotient(rhs) }}

impl std::ops::Div<&SopCube> for &SopCover {
  type Output = SopCover;
  fn div(self, rhs: &SopCube)->SopCover { self.quotient_cube(rhs) }}

impl std::ops::Div<Lit> for &SopCover {
  type Output = SopCover;
  fn div(self, rhs: Lit)->SopCover { self.quotient_lit(rhs) }}

impl fmt::Display for SopCover {
  fn fmt(&self, f: &mut fmt::Formatter)->fmt::Result {
    let mut plus = "";
    for i in 0..self.ncubes {
      write!(f, "{}{}", plus, self.get_cube(i))?;
      plus = " + "; }
    Ok(()) }}

impl fmt::Debug for SopCover {
  fn fmt(&self, f: &mut fmt::Formatter)->fmt::Result { write!(f, "{}", self) }}

// -- sorting -------------------------------------------------------------

/// drop adjacent duplicate cubes; the body must already be sorted.
fn dedup(body: &mut [u64], cs: usize, ncubes: usize)->usize {
  if ncubes < 2 { return ncubes }
  let mut w = 1;
  for r in 1..ncubes {
    if body[r * cs..(r + 1) * cs] == body[(w - 1) * cs..w * cs] { continue }
    if r != w { body.copy_within(r * cs..(r + 1) * cs, w * cs); }
    w += 1; }
  w }

/// merge sort into descending order. The small cases are unrolled; the
/// general case merges through an external scratch buffer.
struct SortCtx {
  cs: usize,
  scratch: Vec<u64>,
}

impl SortCtx {
  fn cmp(&self, bv: &[u64], i: usize, j: usize)->std::cmp::Ordering {
    bv[i * self.cs..(i + 1) * self.cs].cmp(&bv[j * self.cs..(j + 1) * self.cs]) }

  fn less(&self, bv: &[u64], i: usize, j: usize)->bool {
    self.cmp(bv, i, j) == std::cmp::Ordering::Less }

  fn swap(&self, bv: &mut [u64], i: usize, j: usize) {
    for k in 0..self.cs { bv.swap(i * self.cs + k, j * self.cs + k); }}

  /// bv[i] <- bv[j], bv[j] <- bv[k], bv[k] <- bv[i].
  fn rotate3(&mut self, bv: &mut [u64], i: usize, j: usize, k: usize) {
    self.save(bv, i);
    bv.copy_within(j * self.cs..(j + 1) * self.cs, i * self.cs);
    bv.copy_within(k * self.cs..(k + 1) * self.cs, j * self.cs);
    self.restore(bv, k); }

  /// bv[i] <- bv[j], bv[j] <- bv[k], bv[k] <- bv[l], bv[l] <- bv[i].
  fn rotate4(&mut self, bv: &mut [u64], i: usize, j: usize, k: usize, l: usize) {
    self.save(bv, i);
    bv.copy_within(j * self.cs..(j + 1) * self.cs, i * self.cs);
    bv.copy_within(k * self.cs..(k + 1) * self.cs, j * self.cs);
    bv.copy_within(l * self.cs..(l + 1) * self.cs, k * self.cs);
    self.restore(bv, l); }

  fn save(&mut self, bv: &[u64], i: usize) {
    self.scratch.clear();
    self.scratch.extend_from_slice(&bv[i * self.cs..(i + 1) * self.cs]); }

  fn restore(&self, bv: &mut [u64], i: usize) {
    bv[i * self.cs..(i + 1) * self.cs].copy_from_slice(&self.scratch[..self.cs]); }

  fn sort(&mut self, bv: &mut [u64], start: usize, end: usize) {
    let n = end - start;
    if n <= 1 { return }
    if n == 2 {
      let (a, b) = (start, start + 1);
      if self.less(bv, a, b) { self.swap(bv, a, b); }
      return }
    if n == 3 {
      let (a, b, c) = (start, start + 1, start + 2);
      if self.less(bv, a, b) {
        if self.less(bv, a, c) {
          if self.less(bv, b, c) { self.swap(bv, a, c); }
          else { self.rotate3(bv, a, b, c); }}
        else { self.swap(bv, a, b); }}
      else if self.less(bv, a, c) { self.rotate3(bv, a, c, b); }
      else if self.less(bv, b, c) { self.swap(bv, b, c); }
      return }
    if n == 4 {
      let (a, b, c, d) = (start, start + 1, start + 2, start + 3);
      if self.less(bv, a, b) { self.swap(bv, a, b); }
      if self.less(bv, c, d) { self.swap(bv, c, d); }
      if self.less(bv, a, c) {
        if self.less(bv, a, d) {
          self.swap(bv, a, c);
          self.swap(bv, b, d); }
        else if self.less(bv, b, d) { self.rotate4(bv, a, c, d, b); }
        else { self.rotate3(bv, a, c, b); }}
      else if self.less(bv, b, c) {
        if self.less(bv, b, d) { self.rotate3(bv, b, c, d); }
        else { self.swap(bv, b, c); }}
      return }

    // split, sort both halves, merge through the scratch buffer.
    let half = (n + 1) / 2;
    let mid = start + half;
    self.sort(bv, start, mid);
    self.sort(bv, mid, end);
    // already in order when the boundary pair is ordered.
    if self.cmp(bv, mid - 1, mid) == std::cmp::Ordering::Greater { return }

    let cs = self.cs;
    self.scratch.clear();
    self.scratch.extend_from_slice(&bv[start * cs..mid * cs]);
    let mut l = 0;                 // scratch cube index
    let mut r = mid;               // right-half cube index
    let mut w = start;             // write cube index
    while l < half && r < end {
      let ord = self.scratch[l * cs..(l + 1) * cs].cmp(&bv[r * cs..(r + 1) * cs]);
      if ord == std::cmp::Ordering::Less {
        bv.copy_within(r * cs..(r + 1) * cs, w * cs);
        r += 1; }
      else {
        // ties drain the scratch side first; dedup runs afterwards.
        bv[w * cs..(w + 1) * cs].copy_from_slice(&self.scratch[l * cs..(l + 1) * cs]);
        l += 1; }
      w += 1; }
    while l < half {
      bv[w * cs..(w + 1) * cs].copy_from_slice(&self.scratch[l * cs..(l + 1) * cs]);
      l += 1;
      w += 1; }}}
