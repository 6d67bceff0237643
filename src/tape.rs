// SPDX-License-Identifier: EPL-2.0 OR GPL-2.0-or-later
// SPDX-FileCopyrightText: Bradley M. Bell <bradbell@seanet.com>
// SPDX-FileContributor: 2025 Bradley M. Bell
// ---------------------------------------------------------------------------
//! The append-only tape recorder (component C3) and the per-thread active
//! tape registry (component C6).
//!
//! Link to [parent module](super)
//!
//! Redesign note (see `spec.md` §9 "pointer graphs inside the tape"): the
//! original's literal `BeginOp`/`EndOp`/`InvOp` markers carry no information
//! beyond the structural `n_domain` / running result count already tracked
//! here, so they are folded into those counters rather than recorded as
//! opcodes. `ParOp` is kept as a real opcode: it is load-bearing, since a
//! dependent that is a parameter still needs an address in the variable
//! value space (`spec.md` §4.3, `Dependent(x,y)`).
// ---------------------------------------------------------------------------
use std::cell::RefCell;
use std::sync::Mutex;
use std::thread::LocalKey;

use crate::ad::AD;
use crate::ad_type::ADType;
use crate::base::Base;
use crate::error;
use crate::op::id;

/// Index type used for tape addresses and argument-stream entries.
pub type IndexT = u32;

// ---------------------------------------------------------------------------
// OpSequence
/// One operator stream: either the tape's main (variable) stream or its
/// secondary dynamic-parameter stream.
#[derive(Clone)]
pub struct OpSequence {
    /// Number of independent elements this stream was opened with.
    pub n_domain: usize,
    /// Running count of result slots produced so far (address space size,
    /// not counting the reserved phantom slot 0).
    pub n_result: usize,
    /// Opcode id for each recorded operator, in recording order.
    pub id_seq: Vec<u8>,
    /// `op2arg[k]` is the offset into `arg_seq` where operator `k`'s
    /// argument entries begin; `op2arg.len() == id_seq.len()`.
    pub op2arg: Vec<IndexT>,
    /// Flat argument-index stream; see `op::id` for each opcode's layout.
    pub arg_seq: Vec<IndexT>,
    /// Addresses declared as outputs once the stream is sealed.
    pub dep: Vec<IndexT>,
}

impl OpSequence {
    /// `n_result` starts at `n_domain + 1`: address 0 is the reserved
    /// phantom slot (`spec.md` Testable Property 3), addresses
    /// `1..=n_domain` belong to the independents, so the first operator
    /// appended produces a result at `n_domain + 1`.
    pub fn new(n_domain: usize) -> Self {
        OpSequence {
            n_domain,
            n_result: n_domain + 1,
            id_seq: Vec::new(),
            op2arg: Vec::new(),
            arg_seq: Vec::new(),
            dep: Vec::new(),
        }
    }

    /// Appends operator `op_id` with arguments `args`, producing `n_res`
    /// new result addresses; returns the address of the first result.
    pub fn put_op(&mut self, op_id: u8, args: &[IndexT], n_res: usize) -> IndexT {
        // Arguments are written before the opcode so a failed push can be
        // rolled back by truncating the argument stream alone.
        let arg_start = self.arg_seq.len();
        self.arg_seq.extend_from_slice(args);
        self.op2arg.push(arg_start as IndexT);
        self.id_seq.push(op_id);
        let first = self.n_result as IndexT;
        self.n_result += n_res;
        first
    }

    /// Arguments of operator at position `k`.
    pub fn args(&self, k: usize) -> &[IndexT] {
        let start = self.op2arg[k] as usize;
        let end = if k + 1 < self.op2arg.len() {
            self.op2arg[k + 1] as usize
        } else {
            self.arg_seq.len()
        };
        &self.arg_seq[start..end]
    }

    pub fn n_op(&self) -> usize {
        self.id_seq.len()
    }
}

// ---------------------------------------------------------------------------
// Tape
/// A tape encodes a straight-line program over one fixed `Base`; see
/// `spec.md` §3 "Tape `T`".
pub struct Tape<V> {
    /// Monotonically unique across all tapes ever created in this process;
    /// never 0 (0 means "no tape").
    pub tape_id: usize,
    pub recording: bool,
    /// Secondary operator stream for dynamic parameters.
    pub dyp: OpSequence,
    /// Main operator stream for variables.
    pub var: OpSequence,
    /// Parameter pool. Address 0 is reserved for NaN, address 1 for 1.
    pub par: Vec<V>,
    /// Parallel to `par`: whether the pool entry is a dynamic parameter.
    pub is_dyn: Vec<bool>,
    /// Text pool referenced by print opcodes.
    pub text: Vec<String>,
    /// VecAD pool: length of each recorded indexable vector.
    pub vecad_len: Vec<IndexT>,
    /// VecAD pool: flattened parameter-pool indices of initial elements.
    pub vecad_ind: Vec<IndexT>,
    /// Parallel to `dyp.id_seq`: the pool address of the first result slot
    /// written by each dynamic-parameter operator, so `new_dynamic` can
    /// replay the stream back into the pool (`spec.md` §4.2).
    pub dyn_par_addr: Vec<IndexT>,
}

/// Reserved parameter-pool addresses; see `spec.md` §4.2.
pub const PAR_NAN: IndexT = 0;
pub const PAR_ONE: IndexT = 1;

impl<V: Base> Tape<V> {
    pub fn new() -> Self {
        Tape {
            tape_id: 0,
            recording: false,
            dyp: OpSequence::new(0),
            var: OpSequence::new(0),
            par: vec![V::nan(), V::one()],
            is_dyn: vec![false, false],
            text: Vec::new(),
            vecad_len: Vec::new(),
            vecad_ind: Vec::new(),
            dyn_par_addr: Vec::new(),
        }
    }

    /// Appends a constant to the parameter pool and returns its address.
    pub fn put_con(&mut self, value: V) -> IndexT {
        let addr = self.par.len() as IndexT;
        self.par.push(value);
        self.is_dyn.push(false);
        addr
    }

    /// Appends `values.len()` contiguous dynamic-parameter pool entries
    /// computed by one operator and records how to recompute them in the
    /// `dyp` stream; returns the first entry's pool address.
    pub fn put_dyn_multi(&mut self, op_id: u8, args: &[IndexT], values: &[V]) -> IndexT {
        let addr = self.par.len() as IndexT;
        for &value in values {
            self.par.push(value);
            self.is_dyn.push(true);
        }
        self.dyp.put_op(op_id, args, values.len());
        self.dyn_par_addr.push(addr);
        addr
    }

    /// Single-result convenience wrapper over [Tape::put_dyn_multi].
    pub fn put_dyn(&mut self, op_id: u8, args: &[IndexT], value: V) -> IndexT {
        self.put_dyn_multi(op_id, args, &[value])
    }

    pub fn put_text(&mut self, text: String) -> IndexT {
        let addr = self.text.len() as IndexT;
        self.text.push(text);
        addr
    }
}

impl<V: Base> Default for Tape<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Source of fresh tape ids; shared across all `Base` instantiations in the
/// process because ids must be globally unique (`spec.md` §3).
pub(crate) static NEXT_TAPE_ID: Mutex<usize> = Mutex::new(1);

// ---------------------------------------------------------------------------
// sealed::ThisThreadTape
pub(crate) mod sealed {
    use super::*;

    /// `<V as ThisThreadTape>::get()` returns this thread's tape for `V`;
    /// see `spec.md` §5 "the active-tape registry is keyed by
    /// `(thread_id, Base)`".
    pub trait ThisThreadTape
    where
        Self: Sized + 'static,
    {
        fn get() -> &'static LocalKey<RefCell<Tape<Self>>>;
    }
}
pub(crate) use sealed::ThisThreadTape;

/// Instantiates a thread-local tape slot for concrete value type `$V`.
#[macro_export]
macro_rules! impl_this_thread_tape {
    ($V:ty) => {
        impl $crate::tape::sealed::ThisThreadTape for $V {
            fn get() -> &'static std::thread::LocalKey<
                std::cell::RefCell<$crate::tape::Tape<$V>>,
            > {
                thread_local! {
                    static THIS_THREAD_TAPE:
                        std::cell::RefCell<$crate::tape::Tape<$V>> =
                        std::cell::RefCell::new($crate::tape::Tape::new());
                }
                &THIS_THREAD_TAPE
            }
        }
    };
}
pub use impl_this_thread_tape;

/// Runs `f` with mutable access to this thread's tape for `V`.
pub(crate) fn with_tape<V, R>(f: impl FnOnce(&mut Tape<V>) -> R) -> R
where
    V: Base + ThisThreadTape,
{
    <V as ThisThreadTape>::get().with_borrow_mut(f)
}

// ---------------------------------------------------------------------------
// start_recording / start_recording_dyp / stop_recording / abort_recording

/// Begins a recording with only independent variables; see `spec.md` §4.3
/// `Independent(x)`.
pub fn start_recording<V>(domain: Vec<V>) -> Vec<AD<V>>
where
    V: Base + ThisThreadTape,
{
    let (_dyp, var) = start_recording_dyp(Vec::new(), domain);
    var
}

/// Begins a recording with both dynamic-parameter and variable
/// independents; see `spec.md` §4.3 `Independent(x, dynamic)`.
pub fn start_recording_dyp<V>(dyp_domain: Vec<V>, var_domain: Vec<V>) -> (Vec<AD<V>>, Vec<AD<V>>)
where
    V: Base + ThisThreadTape,
{
    let tape_id = {
        let mut next = NEXT_TAPE_ID.lock().unwrap();
        let id = *next;
        *next += 1;
        id
    };
    with_tape::<V, _>(|tape| {
        if tape.recording {
            error::known(
                "start_recording: a recording is already open on this thread",
            );
        }
        *tape = Tape::new();
        tape.tape_id = tape_id;
        tape.recording = true;
        tape.dyp = OpSequence::new(dyp_domain.len());
        tape.var = OpSequence::new(var_domain.len());

        let mut ad_dyp = Vec::with_capacity(dyp_domain.len());
        for (j, value) in dyp_domain.into_iter().enumerate() {
            let addr = tape.put_con(value);
            tape.is_dyn[addr as usize] = true;
            ad_dyp.push(AD::new(tape_id, addr as usize, ADType::DynamicP, value));
            let _ = j;
        }
        let mut ad_var = Vec::with_capacity(var_domain.len());
        for (j, value) in var_domain.into_iter().enumerate() {
            ad_var.push(AD::new(tape_id, j + 1, ADType::Variable, value));
        }
        (ad_dyp, ad_var)
    })
}

/// Seals the tape into a function object; see `spec.md` §4.3
/// `Dependent(x,y)`.
pub fn stop_recording<V>(range: Vec<AD<V>>) -> crate::adfn::ADfn<V>
where
    V: Base + ThisThreadTape,
{
    with_tape::<V, _>(|tape| {
        if !tape.recording {
            error::known("stop_recording: no recording is open on this thread");
        }
        tape.recording = false;
        let mut dep = Vec::with_capacity(range.len());
        for ad in &range {
            let addr = if ad.ad_type.is_variable() && ad.tape_id == tape.tape_id {
                ad.index as IndexT
            } else {
                // Parameter dependent: bind a fresh variable slot to its
                // value via ParOp so every dependent is addressable in the
                // variable value space.
                let con_addr = if ad.ad_type.is_variable() {
                    error::known("stop_recording: variable belongs to a different tape");
                    0
                } else {
                    tape.put_con(ad.value)
                };
                tape.var.put_op(id::PAR_OP, &[con_addr], 1)
            };
            dep.push(addr);
        }
        tape.var.dep = dep.clone();
        let fun = crate::adfn::ADfn::from_tape(tape, dep);
        tape.dyp = OpSequence::new(0);
        tape.var = OpSequence::new(0);
        fun
    })
}

/// Discards the recording in progress, if any; see `spec.md` §4.3
/// `abort_recording()`.
pub fn abort_recording<V>()
where
    V: Base + ThisThreadTape,
{
    with_tape::<V, _>(|tape| {
        *tape = Tape::new();
    });
}
