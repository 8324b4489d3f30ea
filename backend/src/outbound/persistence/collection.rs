//! Lock-free collection core shared by the store adapters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{DocumentStoreError, WriteOutcome};
use crate::domain::{DocId, Document, Filter, Patch, Projection, ReadOptions, Record};

/// Records of one collection in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub(super) struct Collection<D> {
    records: Vec<Record<D>>,
}

impl<D> Default for Collection<D> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<D: Document> Collection<D> {
    pub(super) fn len(&self) -> usize {
        self.records.len()
    }

    pub(super) fn insert(&mut self, fields: D, now: DateTime<Utc>) -> DocId {
        let id = loop {
            let candidate = DocId::random();
            if self.records.iter().all(|record| record.id != candidate) {
                break candidate;
            }
        };
        self.records.push(Record::stamped(id, fields, now));
        id
    }

    /// Positions of matching records ordered per `options`.
    fn select(
        &self,
        filter: &Filter,
        options: &ReadOptions,
    ) -> Result<Vec<usize>, DocumentStoreError> {
        let mut matches = Vec::new();
        for (index, record) in self.records.iter().enumerate() {
            let projection = Projection::of(record)?;
            if projection.matches(filter) {
                matches.push((index, projection));
            }
        }
        matches.sort_by(|(_, left), (_, right)| options.sort.compare(left, right));
        Ok(matches.into_iter().map(|(index, _)| index).collect())
    }

    fn first(&self, filter: &Filter) -> Result<Option<usize>, DocumentStoreError> {
        if let Some(id) = filter.single_id() {
            return Ok(self.records.iter().position(|record| record.id == id));
        }
        Ok(self
            .select(filter, &ReadOptions::default())?
            .into_iter()
            .next())
    }

    pub(super) fn read_one(&self, filter: &Filter) -> Result<Option<Record<D>>, DocumentStoreError> {
        Ok(self
            .first(filter)?
            .and_then(|index| self.records.get(index).cloned()))
    }

    pub(super) fn read_many(
        &self,
        filter: &Filter,
        options: &ReadOptions,
    ) -> Result<Vec<Record<D>>, DocumentStoreError> {
        Ok(self
            .select(filter, options)?
            .into_iter()
            .filter_map(|index| self.records.get(index).cloned())
            .collect())
    }

    /// Merge `patch` onto the first match. Nothing changes when the patch is
    /// rejected.
    pub(super) fn update_one(
        &mut self,
        filter: &Filter,
        patch: &Patch,
        now: DateTime<Utc>,
    ) -> Result<WriteOutcome, DocumentStoreError> {
        let Some(index) = self.first(filter)? else {
            return Ok(WriteOutcome::MISSED);
        };
        let Some(record) = self.records.get_mut(index) else {
            return Ok(WriteOutcome::MISSED);
        };
        let updated = patch.apply_to(&record.fields)?;
        record.fields = updated;
        record.date_updated = now;
        Ok(WriteOutcome::HIT)
    }

    pub(super) fn delete_one(&mut self, filter: &Filter) -> Result<WriteOutcome, DocumentStoreError> {
        match self.first(filter)? {
            Some(index) => {
                self.records.remove(index);
                Ok(WriteOutcome::HIT)
            }
            None => Ok(WriteOutcome::MISSED),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rstest::{fixture, rstest};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Tag {
        name: String,
        uses: u32,
    }

    impl Document for Tag {
        const COLLECTION: &'static str = "tags";
    }

    fn tag(name: &str) -> Tag {
        Tag {
            name: name.into(),
            uses: 0,
        }
    }

    #[fixture]
    fn start() -> DateTime<Utc> {
        Utc::now()
    }

    #[rstest]
    fn read_many_defaults_to_most_recently_updated(start: DateTime<Utc>) {
        let mut collection = Collection::default();
        collection.insert(tag("a"), start);
        collection.insert(tag("b"), start + Duration::seconds(1));
        collection.insert(tag("c"), start + Duration::seconds(2));

        let names: Vec<String> = collection
            .read_many(&Filter::all(), &ReadOptions::default())
            .expect("read")
            .into_iter()
            .map(|record| record.fields.name)
            .collect();
        assert_eq!(names, ["c", "b", "a"]);
    }

    #[rstest]
    fn ties_keep_insertion_order(start: DateTime<Utc>) {
        let mut collection = Collection::default();
        collection.insert(tag("first"), start);
        collection.insert(tag("second"), start);

        let found = collection
            .read_one(&Filter::all())
            .expect("read")
            .expect("present");
        assert_eq!(found.fields.name, "first");
    }

    #[rstest]
    fn update_targets_most_recent_match(start: DateTime<Utc>) {
        let mut collection = Collection::default();
        collection.insert(tag("dup"), start);
        let newer = collection.insert(tag("dup"), start + Duration::seconds(1));

        let outcome = collection
            .update_one(
                &Filter::all().eq("name", "dup"),
                &Patch::new().set("uses", 3),
                start + Duration::seconds(5),
            )
            .expect("update");
        assert!(outcome.is_hit());

        let updated = collection
            .read_one(&Filter::by_id(newer))
            .expect("read")
            .expect("present");
        assert_eq!(updated.fields.uses, 3);
        assert_eq!(updated.date_updated, start + Duration::seconds(5));
    }

    #[rstest]
    fn rejected_patch_leaves_record_untouched(start: DateTime<Utc>) {
        let mut collection = Collection::default();
        let id = collection.insert(tag("a"), start);

        let result = collection.update_one(
            &Filter::by_id(id),
            &Patch::new().set("uses", "lots"),
            start + Duration::seconds(1),
        );
        assert!(matches!(result, Err(DocumentStoreError::InvalidPatch { .. })));

        let stored = collection
            .read_one(&Filter::by_id(id))
            .expect("read")
            .expect("present");
        assert_eq!(stored.fields, tag("a"));
        assert_eq!(stored.date_updated, start);
    }

    #[rstest]
    fn misses_are_not_errors(start: DateTime<Utc>) {
        let mut collection: Collection<Tag> = Collection::default();
        let id = DocId::random();
        assert_eq!(
            collection
                .update_one(&Filter::by_id(id), &Patch::new(), start)
                .expect("update"),
            WriteOutcome::MISSED
        );
        assert_eq!(
            collection.delete_one(&Filter::by_id(id)).expect("delete"),
            WriteOutcome::MISSED
        );
        assert!(collection.read_one(&Filter::by_id(id)).expect("read").is_none());
    }

    #[rstest]
    fn delete_removes_one_record(start: DateTime<Utc>) {
        let mut collection = Collection::default();
        collection.insert(tag("x"), start);
        collection.insert(tag("x"), start);

        collection
            .delete_one(&Filter::all().eq("name", "x"))
            .expect("delete");
        assert_eq!(collection.len(), 1);
    }
}
