//! Ordered note collection persisted as a single snapshot.
//!
//! # Responsibility
//! - Load or seed the collection, then apply add/create/update/delete.
//! - Allocate positions for notes inserted without one.
//! - Queue explicit change events so renderers never share mutable notes.
//!
//! # Invariants
//! - Ids are unique; insertion order is creation order.
//! - A note's position is assigned once and never rewritten by the store.
//! - A failed snapshot write never rolls back the in-memory mutation.

use crate::layout::allocator::allocate_at;
use crate::model::note::{Note, NoteDraft, NoteId, NotePatch, Position, SUN_NOTE_ID};
use crate::store::backend::SnapshotBackend;
use crate::store::snapshot::{encode, salvage};
use crate::store::{StoreError, StoreResult};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Key the note collection is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "universe_notes";

const SUN_TITLE: &str = "Welcome to your Universe";
const SUN_CONTENT: &str =
    "This is where everything begins. Create a note to add a new floating memory.";
const SUN_COLOR: &str = "#00ff88";
const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";
const DATE_FORMAT: &str = "%d/%m/%Y";
const BACKUP_KEY_SUFFIX: &str = ".backup";

/// Re-render signal emitted by store mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange {
    /// Collection replaced by `load()`.
    Loaded,
    Added(NoteId),
    Updated(NoteId),
    Deleted(NoteId),
}

/// Note collection bound to one snapshot key.
pub struct NoteStore<B: SnapshotBackend, R: Rng = StdRng> {
    backend: B,
    key: String,
    rng: R,
    notes: Vec<Note>,
    changes: Vec<StoreChange>,
    revision: u64,
    last_persist_error: Option<String>,
}

impl<B: SnapshotBackend> NoteStore<B, StdRng> {
    /// Creates an empty, not yet loaded store with entropy-seeded jitter.
    pub fn new(backend: B, key: impl Into<String>) -> Self {
        Self::with_rng(backend, key, StdRng::from_entropy())
    }

    /// Creates a store whose placement and colors are reproducible.
    pub fn seeded(backend: B, key: impl Into<String>, seed: u64) -> Self {
        Self::with_rng(backend, key, StdRng::seed_from_u64(seed))
    }
}

impl<B: SnapshotBackend, R: Rng> NoteStore<B, R> {
    pub fn with_rng(backend: B, key: impl Into<String>, rng: R) -> Self {
        Self {
            backend,
            key: key.into(),
            rng,
            notes: Vec::new(),
            changes: Vec::new(),
            revision: 0,
            last_persist_error: None,
        }
    }

    /// Loads the persisted snapshot, seeding the sun note when none is usable.
    ///
    /// # Contract
    /// - Absent snapshot: exactly one default note is created and persisted.
    /// - Unparseable snapshot: logged as a warning and treated as absent.
    /// - Parseable snapshot with bad entries: the bad entries are dropped and
    ///   the valid notes kept.
    /// - Any stored text that is about to be rewritten without all of its
    ///   entries is first copied to `backup_key()`; if that copy fails the
    ///   stored snapshot is left untouched.
    /// - Notes persisted without a position get one allocated from their index.
    ///
    /// # Errors
    /// - Returns backend read failures; write failures are only recorded.
    pub fn load(&mut self) -> StoreResult<&[Note]> {
        let (notes, needs_persist) = match self.backend.read(&self.key)? {
            None => {
                info!(
                    "event=store_load module=store status=ok source=default key={}",
                    self.key
                );
                (vec![default_sun_note()], true)
            }
            Some(raw) => self.recover(&raw),
        };

        self.notes = notes;
        self.record_change(StoreChange::Loaded);
        if needs_persist {
            self.persist_best_effort();
        }
        Ok(&self.notes)
    }

    /// All notes in store order.
    pub fn list(&self) -> &[Note] {
        &self.notes
    }

    /// Owned copy of the current collection.
    pub fn snapshot(&self) -> Vec<Note> {
        self.notes.clone()
    }

    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Appends a note, allocating its position from the current length.
    ///
    /// # Errors
    /// - `StoreError::Validation` for invalid fields.
    /// - `StoreError::DuplicateId` when the id is already present.
    pub fn add(&mut self, mut note: Note) -> StoreResult<Note> {
        note.validate()?;
        if self.get(note.id).is_some() {
            return Err(StoreError::DuplicateId(note.id));
        }

        if note.position.is_none() {
            note.position = Some(allocate_at(self.notes.len(), &mut self.rng));
        }

        self.notes.push(note.clone());
        self.record_change(StoreChange::Added(note.id));
        self.persist_best_effort();
        Ok(note)
    }

    /// Creates a note from a draft, assigning id, date and missing color.
    ///
    /// # Errors
    /// - `StoreError::IdsExhausted` once a note holds `NoteId::MAX`.
    /// - Everything `add` returns.
    pub fn create(&mut self, draft: NoteDraft) -> StoreResult<Note> {
        let id = self.next_id()?;
        let color = match draft.color {
            Some(color) => color,
            None => generate_color(&mut self.rng),
        };
        let mut note = Note::new(id, draft.title, draft.content, color, today());
        note.position = draft.position;
        self.add(note)
    }

    /// Applies a patch and returns the new record.
    ///
    /// Position, id and creation date are never touched.
    ///
    /// # Errors
    /// - `StoreError::NotFound` for unknown ids.
    /// - `StoreError::Validation` when the patched record is invalid.
    pub fn update(&mut self, id: NoteId, patch: &NotePatch) -> StoreResult<Note> {
        let index = self.index_of(id).ok_or(StoreError::NotFound(id))?;
        if patch.is_empty() {
            return Ok(self.notes[index].clone());
        }

        let next = patch.apply_to(&self.notes[index]);
        next.validate()?;
        self.notes[index] = next.clone();
        self.record_change(StoreChange::Updated(id));
        self.persist_best_effort();
        Ok(next)
    }

    /// Removes the note with `id`.
    ///
    /// Returns `false` without persisting when no such note exists.
    pub fn delete(&mut self, id: NoteId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };

        self.notes.remove(index);
        self.record_change(StoreChange::Deleted(id));
        self.persist_best_effort();
        true
    }

    /// Persists the whole collection under the store key.
    pub fn save(&mut self) -> StoreResult<()> {
        let raw = encode(&self.notes)?;
        self.backend.write(&self.key, &raw)?;
        self.last_persist_error = None;
        Ok(())
    }

    /// Random `#RRGGBB` color drawn from the store rng.
    pub fn generate_color(&mut self) -> String {
        generate_color(&mut self.rng)
    }

    /// `(id, position)` pairs of every placed note, in store order.
    pub fn positions(&self) -> Vec<(NoteId, Position)> {
        self.notes
            .iter()
            .filter_map(|note| note.position.map(|position| (note.id, position)))
            .collect()
    }

    /// Drains change events queued since the previous call.
    pub fn take_changes(&mut self) -> Vec<StoreChange> {
        std::mem::take(&mut self.changes)
    }

    /// Counter bumped by every applied mutation and load.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Message of the most recent failed write, cleared by the next success.
    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Key that receives the raw stored text before a lossy rewrite.
    pub fn backup_key(&self) -> String {
        format!("{}{BACKUP_KEY_SUFFIX}", self.key)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    fn index_of(&self, id: NoteId) -> Option<usize> {
        self.notes.iter().position(|note| note.id == id)
    }

    fn next_id(&self) -> StoreResult<NoteId> {
        match self.notes.iter().map(|note| note.id).max() {
            None => Ok(SUN_NOTE_ID),
            Some(max) => max.checked_add(1).ok_or(StoreError::IdsExhausted),
        }
    }

    /// Rebuilds the collection from stored text; the flag says whether the
    /// result must be written back.
    fn recover(&mut self, raw: &str) -> (Vec<Note>, bool) {
        let salvaged = match salvage(raw) {
            Ok(salvaged) => salvaged,
            Err(err) => {
                warn!(
                    "event=store_load module=store status=warn source=default key={} reason=corrupt_snapshot error={}",
                    self.key, err
                );
                let preserved = self.preserve_raw(raw);
                return (vec![default_sun_note()], preserved);
            }
        };

        for (index, reason) in &salvaged.dropped {
            warn!(
                "event=store_load module=store status=warn key={} reason=invalid_note index={} error={}",
                self.key, index, reason
            );
        }
        let lossy = !salvaged.is_clean();
        let preserved = !lossy || self.preserve_raw(raw);

        let mut notes = salvaged.notes;
        if lossy && notes.is_empty() {
            notes.push(default_sun_note());
        }
        let backfilled = self.backfill_positions(&mut notes);
        info!(
            "event=store_load module=store status=ok source=snapshot key={} count={} dropped={} backfilled={}",
            self.key,
            notes.len(),
            salvaged.dropped.len(),
            backfilled
        );
        (notes, preserved && (lossy || backfilled > 0))
    }

    fn preserve_raw(&mut self, raw: &str) -> bool {
        let backup_key = self.backup_key();
        match self.backend.write(&backup_key, raw) {
            Ok(()) => {
                warn!(
                    "event=snapshot_backup module=store status=ok key={} backup_key={}",
                    self.key, backup_key
                );
                true
            }
            Err(err) => {
                warn!(
                    "event=snapshot_backup module=store status=error key={} backup_key={} error={}",
                    self.key, backup_key, err
                );
                self.last_persist_error = Some(err.to_string());
                false
            }
        }
    }

    fn backfill_positions(&mut self, notes: &mut [Note]) -> usize {
        let mut backfilled = 0;
        for (index, note) in notes.iter_mut().enumerate() {
            if note.position.is_none() {
                note.position = Some(allocate_at(index, &mut self.rng));
                backfilled += 1;
            }
        }
        backfilled
    }

    fn record_change(&mut self, change: StoreChange) {
        self.revision += 1;
        self.changes.push(change);
    }

    fn persist_best_effort(&mut self) {
        if let Err(err) = self.save() {
            warn!(
                "event=snapshot_write module=store status=warn key={} count={} error={}",
                self.key,
                self.notes.len(),
                err
            );
            self.last_persist_error = Some(err.to_string());
        }
    }
}

/// Random `#RRGGBB` color using uppercase hex digits.
pub fn generate_color<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut color = String::with_capacity(7);
    color.push('#');
    for _ in 0..6 {
        color.push(char::from(HEX_DIGITS[rng.gen_range(0..HEX_DIGITS.len())]));
    }
    color
}

fn default_sun_note() -> Note {
    Note::new(SUN_NOTE_ID, SUN_TITLE, SUN_CONTENT, SUN_COLOR, today())
        .with_position(Position::origin())
}

fn today() -> String {
    chrono::Local::now().format(DATE_FORMAT).to_string()
}
