use crate::models::{Professional, Room, ScheduleError, Specialty, Unit};

/// Immutable professional and unit tables.
///
/// Lookups never fail: an unknown id resolves to the first entry of the
/// table. Construction rejects empty tables so that entry always exists.
#[derive(Debug, Clone)]
pub struct Directory {
    professionals: Vec<Professional>,
    units: Vec<Unit>,
}

impl Directory {
    pub fn new(professionals: Vec<Professional>, units: Vec<Unit>) -> Result<Self, ScheduleError> {
        if professionals.is_empty() {
            return Err(ScheduleError::EmptyDirectory("professionals"));
        }
        if units.is_empty() {
            return Err(ScheduleError::EmptyDirectory("units"));
        }
        Ok(Self { professionals, units })
    }

    pub fn resolve_professional(&self, id: i64) -> &Professional {
        self.professionals
            .iter()
            .find(|p| p.id == id)
            .unwrap_or(&self.professionals[0])
    }

    pub fn resolve_unit(&self, id: i64) -> &Unit {
        self.units
            .iter()
            .find(|u| u.id == id)
            .unwrap_or(&self.units[0])
    }

    pub fn professionals(&self) -> &[Professional] {
        &self.professionals
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }
}

impl Default for Directory {
    fn default() -> Self {
        Self {
            professionals: vec![
                professional(2684, "Dr(a). Pat Duarte", 55, "Cardiologia"),
                professional(512, "Dr. Ícaro Menezes", 77, "Dermatologia"),
                professional(782, "Dr(a). Helena Faria", 33, "Pediatria"),
                professional(903, "Dr. André Ribeiro", 18, "Ortopedia"),
            ],
            units: vec![
                unit(901, "Clínica Central", 12, "Sala Azul"),
                unit(905, "Unidade Bela Vista", 203, "Consultório 3"),
                unit(910, "Centro Norte", 21, "Sala Verde"),
                unit(915, "Hub Telemedicina", 7, "Estúdio 1"),
            ],
        }
    }
}

fn professional(id: i64, name: &str, specialty_id: i64, specialty: &str) -> Professional {
    Professional {
        id,
        name: name.to_string(),
        specialty: Specialty {
            id: specialty_id,
            name: specialty.to_string(),
        },
    }
}

fn unit(id: i64, name: &str, room_id: i64, room: &str) -> Unit {
    Unit {
        id,
        name: name.to_string(),
        room: Room {
            id: room_id,
            name: room.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_known_ids_resolve() {
        let directory = Directory::default();
        let prof = directory.resolve_professional(782);
        assert_eq!(prof.name, "Dr(a). Helena Faria");
        assert_eq!(prof.specialty.name, "Pediatria");

        let unit = directory.resolve_unit(915);
        assert_eq!(unit.name, "Hub Telemedicina");
        assert_eq!(unit.room.id, 7);
    }

    #[test]
    fn test_unknown_ids_fall_back_to_first_entry() {
        let directory = Directory::default();
        for id in [4102, 0, -1, i64::MAX] {
            assert_eq!(directory.resolve_professional(id).id, 2684);
        }
        for id in [108, 0, -7] {
            assert_eq!(directory.resolve_unit(id).id, 901);
        }
    }

    #[test]
    fn test_custom_tables_use_their_own_first_entry() {
        let directory = Directory::new(
            vec![professional(1, "Dr. Test", 2, "Clínica Geral")],
            vec![unit(3, "Unidade Teste", 4, "Sala 4")],
        )
        .unwrap();
        assert_eq!(directory.resolve_professional(999).name, "Dr. Test");
        assert_eq!(directory.resolve_unit(999).name, "Unidade Teste");
    }

    #[test]
    fn test_empty_tables_rejected() {
        assert_matches!(
            Directory::new(vec![], Directory::default().units().to_vec()),
            Err(ScheduleError::EmptyDirectory("professionals"))
        );
        assert_matches!(
            Directory::new(Directory::default().professionals().to_vec(), vec![]),
            Err(ScheduleError::EmptyDirectory("units"))
        );
    }
}
