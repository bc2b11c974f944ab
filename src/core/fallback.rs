//! Rule-based partner suggestions drawn from a fixed catalog.
//!
//! Used when the generative backend is unavailable, or when the caller asks for
//! demo mode. Everything here is a compile-time constant, so the result is a
//! pure function of the project input.

use crate::domain::model::{
    average_match_score, AnalysisResult, PartnerCandidate, ProjectInput, PARTNERS_PER_RESULT,
};

pub const CATEGORY_DEFI: &str = "DeFi";
pub const CATEGORY_NFT_GAMING: &str = "NFT/Gaming";
pub const CATEGORY_SOCIAL_CREATOR: &str = "Social/Creator";
pub const CATEGORY_DAO_GOVERNANCE: &str = "DAO/Governance";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Archetype {
    pub name: &'static str,
    pub partner_type: &'static str,
    pub description: &'static str,
    pub reasoning: &'static str,
    /// match, mission, technical, strategic
    pub scores: [u8; 4],
    pub community: &'static str,
    pub tvl: &'static str,
}

impl Archetype {
    pub fn to_candidate(&self) -> PartnerCandidate {
        let [match_score, mission_score, technical_score, strategic_score] = self.scores;
        PartnerCandidate {
            name: self.name.to_string(),
            partner_type: self.partner_type.to_string(),
            description: self.description.to_string(),
            reasoning: self.reasoning.to_string(),
            match_score,
            mission_score,
            technical_score,
            strategic_score,
            community: Some(self.community.to_string()),
            tvl: Some(self.tvl.to_string()),
        }
    }
}

pub const AAVE: Archetype = Archetype {
    name: "Aave",
    partner_type: "DeFi Protocol",
    description: "Decentralized lending protocol holding more than $6B in total value locked across several blockchain networks.",
    reasoning: "A natural DeFi integration partner. Their lending infrastructure can complement your financial mechanisms and supply liquidity.",
    scores: [89, 85, 92, 90],
    community: "450K+ Discord",
    tvl: "$6.2B",
};

pub const CHAINLINK: Archetype = Archetype {
    name: "Chainlink",
    partner_type: "Infrastructure",
    description: "Decentralized oracle network delivering real-world data to smart contracts on many blockchains.",
    reasoning: "Core infrastructure for reliable price feeds and external data. Accurate market data is critical for any DeFi application.",
    scores: [82, 78, 88, 80],
    community: "280K+ Twitter",
    tvl: "Secures $75B+",
};

pub const OPENSEA: Archetype = Archetype {
    name: "OpenSea",
    partner_type: "NFT Platform",
    description: "Leading NFT marketplace where users buy, sell and discover digital items across multiple blockchains.",
    reasoning: "A direct channel for NFT distribution and marketplace integration. Their user base and tooling can speed up adoption of your platform.",
    scores: [87, 90, 84, 88],
    community: "1.2M+ Discord",
    tvl: "$24B+ Volume",
};

pub const SNAPSHOT: Archetype = Archetype {
    name: "Snapshot",
    partner_type: "DAO Tooling",
    description: "Decentralized voting platform used by major DAOs for governance decisions and community polls.",
    reasoning: "Proven voting infrastructure for robust governance. Their DAO experience matches your governance requirements closely.",
    scores: [91, 95, 86, 92],
    community: "80K+ Users",
    tvl: "Powers 15K+ DAOs",
};

pub const POLYGON: Archetype = Archetype {
    name: "Polygon",
    partner_type: "Infrastructure",
    description: "Ethereum scaling solution offering faster and cheaper transactions for decentralized applications.",
    reasoning: "Lower transaction costs and a smoother user experience. Their ecosystem support and developer tools can shorten your development timeline.",
    scores: [85, 82, 89, 84],
    community: "180K+ Discord",
    tvl: "$1.2B+ TVL",
};

pub const GITCOIN: Archetype = Archetype {
    name: "Gitcoin",
    partner_type: "Funding Platform",
    description: "Web3 funding platform connecting projects with contributors through grants and bounties for public goods.",
    reasoning: "A funding route through their grants rounds. Their focus on public goods fits an early project's mission and growth needs.",
    scores: [78, 85, 70, 82],
    community: "65K+ Twitter",
    tvl: "$50M+ Distributed",
};

pub const THE_GRAPH: Archetype = Archetype {
    name: "The Graph",
    partner_type: "Infrastructure",
    description: "Decentralized indexing protocol that lets applications query blockchain data through open APIs called subgraphs.",
    reasoning: "Fast, reliable access to onchain data without running custom indexers. Publishing a subgraph also makes your project visible to their developer community.",
    scores: [76, 72, 84, 74],
    community: "120K+ Twitter",
    tvl: "Serves 1B+ Queries Monthly",
};

pub const ENS: Archetype = Archetype {
    name: "ENS",
    partner_type: "Identity Protocol",
    description: "Ethereum Name Service maps human-readable names to wallet addresses, content hashes and metadata.",
    reasoning: "Readable identities improve onboarding and trust. Integrating ENS names and profiles is low effort and widely recognized by users.",
    scores: [74, 76, 78, 70],
    community: "150K+ Twitter",
    tvl: "2M+ Names Registered",
};

pub const FILECOIN: Archetype = Archetype {
    name: "Filecoin",
    partner_type: "Storage Network",
    description: "Decentralized storage network providing verifiable, persistent storage for application data and media.",
    reasoning: "Durable decentralized storage for project assets and data. Their ecosystem grants also back projects that build on the network.",
    scores: [72, 74, 76, 69],
    community: "90K+ Slack",
    tvl: "$100M+ Ecosystem Fund",
};

/// Category-triggered archetypes, in the order they are appended.
pub const CATEGORY_RULES: &[(&[&str], &[Archetype])] = &[
    (&[CATEGORY_DEFI], &[AAVE, CHAINLINK]),
    (&[CATEGORY_NFT_GAMING, CATEGORY_SOCIAL_CREATOR], &[OPENSEA]),
    (&[CATEGORY_DAO_GOVERNANCE], &[SNAPSHOT]),
];

/// Appended for every project after the category matches.
pub const UNIVERSAL: &[Archetype] = &[POLYGON, GITCOIN];

/// Tops up the selection when category matches leave it short.
pub const RESERVE: &[Archetype] = &[THE_GRAPH, ENS, FILECOIN];

/// Picks the archetypes for a project: category matches, universal entries,
/// truncated to five and topped up from the reserve.
pub fn select_archetypes(input: &ProjectInput) -> Vec<Archetype> {
    let mut selected: Vec<Archetype> = CATEGORY_RULES
        .iter()
        .filter(|(triggers, _)| triggers.iter().any(|t| input.has_category(t)))
        .flat_map(|(_, archetypes)| archetypes.iter().copied())
        .collect();

    selected.extend(UNIVERSAL.iter().copied());
    selected.truncate(PARTNERS_PER_RESULT);

    for reserve in RESERVE {
        if selected.len() >= PARTNERS_PER_RESULT {
            break;
        }
        selected.push(*reserve);
    }

    selected
}

pub fn analyze_offline(input: &ProjectInput) -> AnalysisResult {
    let partners: Vec<PartnerCandidate> = select_archetypes(input)
        .iter()
        .map(Archetype::to_candidate)
        .collect();

    let summary = format!(
        "Based on the analysis of {name}, we identified {count} strategic partnership opportunities \
that fit your {categories} focus. These partners are technically compatible with a {stage} stage \
project and suit your {funding} funding requirements. The main opportunities are infrastructure \
partnerships for technical scaling, ecosystem integrations for user acquisition, and funding \
platform connections for financial growth. The average match score of {average}% points to strong \
collaboration potential. Start conversations with the highest-scoring partners and focus on \
technical integrations that shorten your development timeline.",
        name = input.name,
        count = partners.len(),
        categories = input.categories.join(", "),
        stage = input.stage,
        funding = input.funding_stage,
        average = average_match_score(&partners),
    );

    AnalysisResult {
        summary,
        partners,
        is_demo: true,
    }
}
