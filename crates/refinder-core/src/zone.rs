//! Zone extraction: one zone actor's archive into a [`ZoneNode`].
//!
//! A zone actor is a mini-archive whose records each carry part of the
//! zone's state. Fields are accumulated across records: a record that
//! lacks a field never clears a value an earlier record provided.

use refinder_types::{Archive, NO_DESTINATION, Properties, Value, ZoneId, ZoneLink, ZoneNode};

use crate::error::Result;
use crate::property::{PropertyExt, element_struct};

/// Class name of zone actors in the instance container.
pub const ZONE_ACTOR_CLASS: &str = "ZoneActor";

const ZONE_LINKS: &str = "ZoneLinks";

/// Decode one `ZoneLinks` element.
fn extract_link(element: &Value) -> Result<ZoneLink> {
    let props = element_struct(element, ZONE_LINKS)?;
    Ok(ZoneLink {
        target_zone_id: ZoneId(props.opt_i32("ZoneID")?.unwrap_or_default()),
        label: props.opt_text("Label")?.unwrap_or_default().to_owned(),
        link_type: props.opt_enum("Type")?.unwrap_or_default().to_owned(),
        destination_link_id: props
            .opt_str("DestinationLink")?
            .unwrap_or(NO_DESTINATION)
            .to_owned(),
        destination_zone_id: props
            .opt_str("DestinationZone")?
            .unwrap_or(NO_DESTINATION)
            .to_owned(),
        name_id: props.opt_str("NameID")?.unwrap_or_default().to_owned(),
    })
}

/// Fold one record's properties into the zone under construction.
fn accumulate(zone: &mut ZoneNode, props: &Properties) -> Result<()> {
    if let Some(id) = props.opt_i32("ID")? {
        zone.id = ZoneId(id);
    }
    if let Some(parent) = props.opt_i32("ParentZoneID")? {
        zone.parent_id = ZoneId(parent);
    }
    if let Some(quest) = props.opt_i32("QuestID")? {
        zone.quest_id = quest;
    }
    if let Some(label) = props.opt_text("Label")? {
        label.clone_into(&mut zone.label);
    }
    if let Some(links) = props.opt_struct_array(ZONE_LINKS)? {
        for element in links {
            zone.links.push(extract_link(element)?);
        }
    }
    Ok(())
}

/// Build a zone node from a zone actor's archive.
///
/// Items, events and children are left empty; the tree assembler fills
/// them in.
pub fn extract_zone(archive: &Archive) -> Result<ZoneNode> {
    let mut zone = ZoneNode::new(ZoneId::NO_PARENT, ZoneId::NO_PARENT);
    for record in archive.objects.iter().filter(|r| !r.properties.is_empty()) {
        accumulate(&mut zone, &record.properties)?;
    }
    Ok(zone)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use refinder_types::{Record, TextValue};

    use super::*;
    use crate::error::ReconstructError;

    fn waypoint(label: &str, dest_link: &str, dest_zone: &str) -> Value {
        Value::map([
            ("ZoneID", Value::Int32(10)),
            ("Label", Value::literal_text(label)),
            ("Type", Value::enumeration("EZoneLinkType::Waypoint")),
            ("DestinationLink", Value::String(dest_link.to_owned())),
            ("DestinationZone", Value::String(dest_zone.to_owned())),
            ("NameID", Value::String("Link_1".to_owned())),
        ])
    }

    #[test]
    fn accumulates_across_records() {
        let archive = Archive::new(vec![
            Record::new("Zone")
                .with_property("ID", Value::Int32(10))
                .with_property("ParentZoneID", Value::Int32(0))
                .with_property("QuestID", Value::Int32(99)),
            Record::new("Empty"),
            Record::new("ZoneData")
                .with_property(
                    "Label",
                    Value::Text(TextValue::Localized {
                        namespace: String::new(),
                        key: "k".to_owned(),
                        source_string: "Ancient Canopy".to_owned(),
                    }),
                )
                .with_property(
                    "ZoneLinks",
                    Value::ArrayOfStruct(vec![waypoint("Canopy", "L", "Z")]),
                ),
        ]);

        let zone = extract_zone(&archive).unwrap();
        assert_eq!(zone.id, ZoneId(10));
        assert!(zone.parent_id.is_no_parent());
        assert_eq!(zone.quest_id, 99);
        assert_eq!(zone.label, "Ancient Canopy");
        assert_eq!(zone.links.len(), 1);
        let link = zone.links.first();
        assert_eq!(link.map(|l| l.link_type.as_str()), Some("EZoneLinkType::Waypoint"));
        assert_eq!(link.map(|l| l.label.as_str()), Some("Canopy"));
        assert_eq!(link.map(ZoneLink::has_destination), Some(true));
    }

    #[test]
    fn later_record_without_field_keeps_value() {
        let archive = Archive::new(vec![
            Record::new("A").with_property("ID", Value::Int32(5)),
            Record::new("B").with_property("QuestID", Value::Int32(1)),
        ]);
        let zone = extract_zone(&archive).ok();
        assert_eq!(zone.map(|z| z.id), Some(ZoneId(5)));
    }

    #[test]
    fn missing_link_destinations_default_to_none() {
        let archive = Archive::new(vec![Record::new("A").with_property(
            "ZoneLinks",
            Value::ArrayOfStruct(vec![Value::map([("ZoneID", Value::Int32(1))])]),
        )]);
        let zone = extract_zone(&archive).ok();
        let link = zone.as_ref().and_then(|z| z.links.first());
        assert_eq!(link.map(|l| l.destination_zone_id.as_str()), Some(NO_DESTINATION));
        assert_eq!(link.map(ZoneLink::has_destination), Some(false));
    }

    #[test]
    fn wrong_variant_fails() {
        let archive = Archive::new(vec![
            Record::new("A").with_property("ParentZoneID", Value::String("1".to_owned())),
        ]);
        assert!(matches!(
            extract_zone(&archive),
            Err(ReconstructError::Parse { .. })
        ));

        let archive = Archive::new(vec![Record::new("A").with_property(
            "ZoneLinks",
            Value::ArrayOfStruct(vec![Value::map([("Type", Value::Int32(3))])]),
        )]);
        assert!(extract_zone(&archive).is_err());
    }
}
