use crate::{
    entity::{EntityKind, Morph},
    value::{Columns, ColumnsMut, Value},
    Error,
};

/// A resolved polymorphic reference: a known kind plus a row id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MorphRef {
    pub kind: EntityKind,
    pub id: i64,
}

impl MorphRef {
    pub fn new(kind: EntityKind, id: i64) -> Self {
        Self { kind, id }
    }

    /// Maps a stored discriminator onto a kind. Unknown discriminators are
    /// data corruption and fail with [`Error::UnknownMorphType`].
    pub fn parse(discriminator: &str, id: i64) -> Result<Self, Error> {
        Ok(Self {
            kind: EntityKind::from_discriminator(discriminator)?,
            id,
        })
    }

    /// Reads the `(type, id)` pair a row holds. `None` when the pair is unset.
    pub fn from_row(row: &dyn Columns, morph: &Morph) -> Result<Option<Self>, Error> {
        match (row.column(morph.type_column), row.column(morph.id_column)) {
            (Some(Value::Text(discriminator)), Some(Value::Int(id))) => {
                Self::parse(&discriminator, id).map(Some)
            }
            _ => Ok(None),
        }
    }
}

impl EntityKind {
    /// Every spelling a row of this kind may carry in a `*_type` column.
    pub fn stored_names(self) -> Vec<String> {
        let mut names = vec![
            self.discriminator().to_owned(),
            format!("App\\Models\\{}", self.class_name()),
        ];
        names.extend(
            self.aliases()
                .flat_map(|(alias, class)| [alias.to_owned(), format!("App\\Models\\{class}")]),
        );
        names
    }
}

/// Rewrites every `*_type` column of `row` to its canonical discriminator.
pub(crate) fn canonicalize(row: &mut dyn ColumnsMut, morphs: &[Morph]) -> Result<(), Error> {
    for morph in morphs {
        if let Some(Value::Text(discriminator)) = row.column(morph.type_column) {
            let kind = EntityKind::from_discriminator(&discriminator)?;
            if kind.discriminator() != discriminator {
                row.set_column(morph.type_column, Value::from(kind.discriminator()))?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewTerritoryRecord;

    #[test]
    fn parse_rejects_unknown_types() {
        assert_eq!(
            MorphRef::parse("App\\Models\\Contact", 4).unwrap(),
            MorphRef::new(EntityKind::People, 4)
        );
        assert!(matches!(
            MorphRef::parse("invoice_line", 4),
            Err(Error::UnknownMorphType(_))
        ));
    }

    #[test]
    fn aliases_are_canonicalized_on_write() {
        let mut record = NewTerritoryRecord {
            team_id: 1,
            territory_id: 1,
            record_type: "organisation".into(),
            record_id: 9,
            is_primary: true,
            assigned_at: jiff::Timestamp::UNIX_EPOCH.into(),
            assignment_reason: None,
        };
        canonicalize(&mut record, &[Morph {
            type_column: "record_type",
            id_column: "record_id",
        }])
        .unwrap();
        assert_eq!(record.record_type, "company");
    }

    #[test]
    fn stored_names_cover_aliases_and_class_names() {
        let names = EntityKind::People.stored_names();
        for name in ["people", "contact", "person", "App\\Models\\People", "App\\Models\\Contact"] {
            assert!(names.iter().any(|n| n == name), "{name}");
        }
    }
}
