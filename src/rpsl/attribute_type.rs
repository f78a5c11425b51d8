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

//! Provides the [`AttributeType`] enumeration of RPSL attributes.

use std::fmt;
use std::str::FromStr;

use crate::util::Caseless;

/// An RPSL attribute type.
///
/// Only attributes that queries can refer to are listed: the key
/// attributes of each object type, the attributes that reference other
/// objects (which inverse queries search), and a handful of common
/// descriptive attributes, which exist so that `-i descr` is rejected
/// as "not inverse searchable" rather than "unknown".
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum AttributeType {
    // Object keys.
    AsBlock,
    AsSet,
    AutNum,
    Domain,
    FilterSet,
    Inet6num,
    Inetnum,
    InetRtr,
    Irt,
    KeyCert,
    Mntner,
    NicHdl,
    Organisation,
    PeeringSet,
    Person,
    Poem,
    PoeticForm,
    Role,
    Route,
    Route6,
    RouteSet,
    RtrSet,

    // References.
    AbuseC,
    AbuseMailbox,
    AdminC,
    Auth,
    Author,
    DsRdata,
    Fingerpr,
    Form,
    Interface,
    IrtNfy,
    LocalAs,
    MbrsByRef,
    MemberOf,
    Members,
    MntBy,
    MntDomains,
    MntIrt,
    MntLower,
    MntNfy,
    MntRef,
    MntRoutes,
    MpMembers,
    Notify,
    Nserver,
    Org,
    Origin,
    PingHdl,
    RefNfy,
    SponsoringOrg,
    TechC,
    UpdTo,
    ZoneC,

    // Descriptive.
    AsName,
    Country,
    Descr,
    Netname,
    Remarks,
    Source,
    Status,
}

impl AttributeType {
    /// All attribute types, in declaration order.
    pub const ALL: [AttributeType; 61] = [
        Self::AsBlock,
        Self::AsSet,
        Self::AutNum,
        Self::Domain,
        Self::FilterSet,
        Self::Inet6num,
        Self::Inetnum,
        Self::InetRtr,
        Self::Irt,
        Self::KeyCert,
        Self::Mntner,
        Self::NicHdl,
        Self::Organisation,
        Self::PeeringSet,
        Self::Person,
        Self::Poem,
        Self::PoeticForm,
        Self::Role,
        Self::Route,
        Self::Route6,
        Self::RouteSet,
        Self::RtrSet,
        Self::AbuseC,
        Self::AbuseMailbox,
        Self::AdminC,
        Self::Auth,
        Self::Author,
        Self::DsRdata,
        Self::Fingerpr,
        Self::Form,
        Self::Interface,
        Self::IrtNfy,
        Self::LocalAs,
        Self::MbrsByRef,
        Self::MemberOf,
        Self::Members,
        Self::MntBy,
        Self::MntDomains,
        Self::MntIrt,
        Self::MntLower,
        Self::MntNfy,
        Self::MntRef,
        Self::MntRoutes,
        Self::MpMembers,
        Self::Notify,
        Self::Nserver,
        Self::Org,
        Self::Origin,
        Self::PingHdl,
        Self::RefNfy,
        Self::SponsoringOrg,
        Self::TechC,
        Self::UpdTo,
        Self::ZoneC,
        Self::AsName,
        Self::Country,
        Self::Descr,
        Self::Netname,
        Self::Remarks,
        Self::Source,
        Self::Status,
    ];

    /// Attributes that `-i person` expands to: every attribute that
    /// refers to a person or role by NIC handle.
    pub const PERSON_REFERENCES: [AttributeType; 5] = [
        Self::AdminC,
        Self::TechC,
        Self::ZoneC,
        Self::Author,
        Self::PingHdl,
    ];

    /// Returns the full name of the attribute and its short name, if it
    /// has one.
    fn names(self) -> (&'static str, Option<&'static str>) {
        match self {
            Self::AsBlock => ("as-block", Some("ak")),
            Self::AsSet => ("as-set", Some("as")),
            Self::AutNum => ("aut-num", Some("an")),
            Self::Domain => ("domain", Some("dn")),
            Self::FilterSet => ("filter-set", Some("fs")),
            Self::Inet6num => ("inet6num", Some("i6")),
            Self::Inetnum => ("inetnum", Some("in")),
            Self::InetRtr => ("inet-rtr", Some("ir")),
            Self::Irt => ("irt", Some("it")),
            Self::KeyCert => ("key-cert", Some("kc")),
            Self::Mntner => ("mntner", Some("mt")),
            Self::NicHdl => ("nic-hdl", Some("nh")),
            Self::Organisation => ("organisation", Some("oa")),
            Self::PeeringSet => ("peering-set", Some("ps")),
            Self::Person => ("person", Some("pn")),
            Self::Poem => ("poem", Some("po")),
            Self::PoeticForm => ("poetic-form", Some("pf")),
            Self::Role => ("role", Some("ro")),
            Self::Route => ("route", Some("rt")),
            Self::Route6 => ("route6", Some("r6")),
            Self::RouteSet => ("route-set", Some("rs")),
            Self::RtrSet => ("rtr-set", Some("is")),
            Self::AbuseC => ("abuse-c", Some("au")),
            Self::AbuseMailbox => ("abuse-mailbox", Some("am")),
            Self::AdminC => ("admin-c", Some("ac")),
            Self::Auth => ("auth", Some("at")),
            Self::Author => ("author", Some("ah")),
            Self::DsRdata => ("ds-rdata", Some("ds")),
            Self::Fingerpr => ("fingerpr", Some("fp")),
            Self::Form => ("form", Some("fr")),
            Self::Interface => ("interface", Some("ze")),
            Self::IrtNfy => ("irt-nfy", Some("iy")),
            Self::LocalAs => ("local-as", Some("la")),
            Self::MbrsByRef => ("mbrs-by-ref", Some("mr")),
            Self::MemberOf => ("member-of", Some("mo")),
            Self::Members => ("members", Some("ms")),
            Self::MntBy => ("mnt-by", Some("mb")),
            Self::MntDomains => ("mnt-domains", Some("md")),
            Self::MntIrt => ("mnt-irt", Some("mi")),
            Self::MntLower => ("mnt-lower", Some("ml")),
            Self::MntNfy => ("mnt-nfy", Some("mn")),
            Self::MntRef => ("mnt-ref", Some("mz")),
            Self::MntRoutes => ("mnt-routes", Some("mu")),
            Self::MpMembers => ("mp-members", Some("mm")),
            Self::Notify => ("notify", Some("ny")),
            Self::Nserver => ("nserver", Some("ns")),
            Self::Org => ("org", Some("og")),
            Self::Origin => ("origin", Some("or")),
            Self::PingHdl => ("ping-hdl", Some("pc")),
            Self::RefNfy => ("ref-nfy", Some("rn")),
            Self::SponsoringOrg => ("sponsoring-org", Some("sp")),
            Self::TechC => ("tech-c", Some("tc")),
            Self::UpdTo => ("upd-to", Some("dt")),
            Self::ZoneC => ("zone-c", Some("zc")),
            Self::AsName => ("as-name", Some("aa")),
            Self::Country => ("country", Some("cy")),
            Self::Descr => ("descr", Some("de")),
            Self::Netname => ("netname", Some("na")),
            Self::Remarks => ("remarks", Some("rm")),
            Self::Source => ("source", Some("so")),
            Self::Status => ("status", Some("st")),
        }
    }

    pub fn name(self) -> &'static str {
        self.names().0
    }

    /// Returns whether an inverse query (`-i`) can search this
    /// attribute.
    pub fn is_inverse_key(self) -> bool {
        matches!(
            self,
            Self::AbuseC
                | Self::AbuseMailbox
                | Self::AdminC
                | Self::Auth
                | Self::Author
                | Self::DsRdata
                | Self::Fingerpr
                | Self::Form
                | Self::Interface
                | Self::IrtNfy
                | Self::LocalAs
                | Self::MbrsByRef
                | Self::MemberOf
                | Self::Members
                | Self::MntBy
                | Self::MntDomains
                | Self::MntIrt
                | Self::MntLower
                | Self::MntNfy
                | Self::MntRef
                | Self::MntRoutes
                | Self::MpMembers
                | Self::Notify
                | Self::Nserver
                | Self::Org
                | Self::Origin
                | Self::PingHdl
                | Self::RefNfy
                | Self::SponsoringOrg
                | Self::TechC
                | Self::UpdTo
                | Self::ZoneC
        )
    }
}

impl FromStr for AttributeType {
    type Err = &'static str;

    /// Parses either the full or the short name, ignoring case.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|attribute_type| {
                let (name, short_name) = attribute_type.names();
                Caseless(text) == Caseless(name)
                    || short_name.map_or(false, |short| Caseless(text) == Caseless(short))
            })
            .ok_or("unknown attribute")
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

////////////////////////////////////////////////////////////////////////
// TESTS                                                              //
////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn names_are_unique() {
        let mut seen = HashSet::new();
        for attribute_type in AttributeType::ALL {
            let (name, short_name) = attribute_type.names();
            assert!(seen.insert(name), "duplicate name {}", name);
            if let Some(short_name) = short_name {
                assert!(seen.insert(short_name), "duplicate name {}", short_name);
            }
        }
    }

    #[test]
    fn parses_full_and_short_names() {
        assert_eq!("mnt-by".parse(), Ok(AttributeType::MntBy));
        assert_eq!("MB".parse(), Ok(AttributeType::MntBy));
        assert_eq!("Admin-C".parse(), Ok(AttributeType::AdminC));
        assert!("mnt-bye".parse::<AttributeType>().is_err());
    }

    #[test]
    fn person_references_are_inverse_keys() {
        for attribute_type in AttributeType::PERSON_REFERENCES {
            assert!(attribute_type.is_inverse_key());
        }
        assert!(!AttributeType::Person.is_inverse_key());
        assert!(!AttributeType::Descr.is_inverse_key());
    }
}
