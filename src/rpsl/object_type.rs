// Copyright 2022 Matthew Ingwersen.
//
// Licensed under the Apache License, Version 2.0 (the "License"); you
// may not use this file except in compliance with the License. You may
// obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or
// implied. See the License for the specific language governing
// permissions and limitations under the License.

//! Provides the [`ObjectType`] enumeration of RPSL object classes.

use std::fmt;
use std::str::FromStr;

use super::AttributeType;
use crate::util::Caseless;

/// An RPSL object type.
///
/// The declaration order is the canonical order in which query results
/// are grouped: address space first, then routing policy, then
/// reverse DNS, then everything else with contacts last. The derived
/// [`Ord`] implementation follows it, so a
/// [`BTreeSet<ObjectType>`](std::collections::BTreeSet) iterates in
/// canonical order.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum ObjectType {
    Inetnum,
    Inet6num,
    AsBlock,
    AutNum,
    AsSet,
    Route,
    Route6,
    RouteSet,
    InetRtr,
    FilterSet,
    PeeringSet,
    RtrSet,
    Domain,
    PoeticForm,
    Poem,
    Mntner,
    Irt,
    KeyCert,
    Organisation,
    Role,
    Person,
}

impl ObjectType {
    /// All object types, in canonical order.
    pub const ALL: [ObjectType; 21] = [
        Self::Inetnum,
        Self::Inet6num,
        Self::AsBlock,
        Self::AutNum,
        Self::AsSet,
        Self::Route,
        Self::Route6,
        Self::RouteSet,
        Self::InetRtr,
        Self::FilterSet,
        Self::PeeringSet,
        Self::RtrSet,
        Self::Domain,
        Self::PoeticForm,
        Self::Poem,
        Self::Mntner,
        Self::Irt,
        Self::KeyCert,
        Self::Organisation,
        Self::Role,
        Self::Person,
    ];

    /// Returns the full name and the two-letter short name of the type.
    fn names(self) -> (&'static str, &'static str) {
        match self {
            Self::Inetnum => ("inetnum", "in"),
            Self::Inet6num => ("inet6num", "i6"),
            Self::AsBlock => ("as-block", "ak"),
            Self::AutNum => ("aut-num", "an"),
            Self::AsSet => ("as-set", "as"),
            Self::Route => ("route", "rt"),
            Self::Route6 => ("route6", "r6"),
            Self::RouteSet => ("route-set", "rs"),
            Self::InetRtr => ("inet-rtr", "ir"),
            Self::FilterSet => ("filter-set", "fs"),
            Self::PeeringSet => ("peering-set", "ps"),
            Self::RtrSet => ("rtr-set", "is"),
            Self::Domain => ("domain", "dn"),
            Self::PoeticForm => ("poetic-form", "pf"),
            Self::Poem => ("poem", "po"),
            Self::Mntner => ("mntner", "mt"),
            Self::Irt => ("irt", "it"),
            Self::KeyCert => ("key-cert", "kc"),
            Self::Organisation => ("organisation", "oa"),
            Self::Role => ("role", "ro"),
            Self::Person => ("person", "pn"),
        }
    }

    pub fn name(self) -> &'static str {
        self.names().0
    }

    pub fn short_name(self) -> &'static str {
        self.names().1
    }

    /// Returns the attributes by which a plain (non-inverse) query can
    /// find objects of this type.
    pub fn lookup_attributes(self) -> &'static [AttributeType] {
        match self {
            Self::Inetnum => &[AttributeType::Inetnum],
            Self::Inet6num => &[AttributeType::Inet6num],
            Self::AsBlock => &[AttributeType::AsBlock],
            Self::AutNum => &[AttributeType::AutNum],
            Self::AsSet => &[AttributeType::AsSet],
            Self::Route => &[AttributeType::Route],
            Self::Route6 => &[AttributeType::Route6],
            Self::RouteSet => &[AttributeType::RouteSet],
            Self::InetRtr => &[AttributeType::InetRtr],
            Self::FilterSet => &[AttributeType::FilterSet],
            Self::PeeringSet => &[AttributeType::PeeringSet],
            Self::RtrSet => &[AttributeType::RtrSet],
            Self::Domain => &[AttributeType::Domain],
            Self::PoeticForm => &[AttributeType::PoeticForm],
            Self::Poem => &[AttributeType::Poem],
            Self::Mntner => &[AttributeType::Mntner],
            Self::Irt => &[AttributeType::Irt],
            Self::KeyCert => &[AttributeType::KeyCert],
            Self::Organisation => &[AttributeType::Organisation],
            Self::Role => &[AttributeType::Role, AttributeType::NicHdl],
            Self::Person => &[AttributeType::Person, AttributeType::NicHdl],
        }
    }
}

impl FromStr for ObjectType {
    type Err = &'static str;

    /// Parses either the full or the short name, ignoring case.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|object_type| {
                let (name, short_name) = object_type.names();
                Caseless(text) == Caseless(name) || Caseless(text) == Caseless(short_name)
            })
            .ok_or("unknown object type")
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn parses_full_and_short_names() {
        assert_eq!("inetnum".parse(), Ok(ObjectType::Inetnum));
        assert_eq!("AUT-NUM".parse(), Ok(ObjectType::AutNum));
        assert_eq!("i6".parse(), Ok(ObjectType::Inet6num));
        assert_eq!("PN".parse(), Ok(ObjectType::Person));
        assert!("inetnum6".parse::<ObjectType>().is_err());
    }

    #[test]
    fn names_round_trip() {
        for object_type in ObjectType::ALL {
            assert_eq!(object_type.name().parse(), Ok(object_type));
            assert_eq!(object_type.short_name().parse(), Ok(object_type));
        }
    }

    #[test]
    fn sets_iterate_in_canonical_order() {
        let set: BTreeSet<ObjectType> = [
            ObjectType::Person,
            ObjectType::Domain,
            ObjectType::Route,
            ObjectType::Inetnum,
        ]
        .into_iter()
        .collect();
        let order: Vec<ObjectType> = set.into_iter().collect();
        assert_eq!(
            order,
            [
                ObjectType::Inetnum,
                ObjectType::Route,
                ObjectType::Domain,
                ObjectType::Person
            ]
        );
    }

    #[test]
    fn every_type_has_lookup_attributes() {
        for object_type in ObjectType::ALL {
            assert!(!object_type.lookup_attributes().is_empty());
        }
    }
}
