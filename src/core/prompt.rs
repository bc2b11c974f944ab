use crate::domain::model::{ProjectInput, PARTNERS_PER_RESULT};

pub const SYSTEM_INSTRUCTION: &str = "You are Ecosync, a Web3 partnership recommendation expert. \
Analyze projects and suggest strategic partners based on mission alignment, technical synergy, \
and strategic value. Always respond with valid JSON.";

const RESPONSE_SHAPE: &str = r#"{
  "summary": "string",
  "partners": [
    {
      "name": "string",
      "type": "string",
      "description": "string",
      "reasoning": "string",
      "matchScore": number,
      "missionScore": number,
      "technicalScore": number,
      "strategicScore": number,
      "community": "string",
      "tvl": "string"
    }
  ]
}"#;

/// Builds the user prompt for one project.
pub fn build_user_prompt(input: &ProjectInput) -> String {
    format!(
        r#"You are Ecosync, an AI agent that helps Web3 founders find the ecosystem partners best suited to their decentralized projects. Read the project's description, goals and technology, then recommend partner DAOs, protocols or Web3 projects that fit it.

Judge every candidate on three criteria:

1. **Mission Alignment** - how closely the partner's goals and philosophy match the founder's. A DAO for decentralized education, for example, aligns with protocols working on credential verification or education funding.

2. **Technical Synergy** - whether the two technology stacks complement each other: shared identity standards, shared token ecosystems, or common blockchain infrastructure that makes integration practical.

3. **Strategic Value** - the room for mutual benefit in community growth, funding, user acquisition or market expansion, including access to each other's users, cross-promotion and funding connections.

Draw on your knowledge of DAOs, DeFi protocols, NFT platforms, decentralized social networks, storage, identity protocols and funding mechanisms.

**Project to Analyze:**
- Name: {name}
- Description: {description}
- Development Stage: {stage}
- Funding Stage: {funding_stage}
- Primary Categories: {categories}

**Analysis Requirements:**
- Recommend exactly {count} strategic partners that are real, established Web3 projects
- Favor practical partnerships that move fundraising, community growth and technical development forward
- Prefer partners with demonstrated traction and active communities
- Take the project's current stage and funding needs into account

For each partner provide:
- name: the real project name
- type: a specific type (DAO, DeFi Protocol, Infrastructure, Funding Platform, Social Platform, NFT Platform, Identity Protocol, ...)
- description: what they do, 2-3 sentences at most
- reasoning: why the partnership makes strategic sense, 2-3 sentences on concrete benefits
- matchScore: overall compatibility, 1-100 (be realistic, perfect matches are rare)
- missionScore: mission alignment, 1-100
- technicalScore: technical synergy, 1-100
- strategicScore: strategic value, 1-100
- community: approximate community size if known (e.g. "25K+ Discord", "180K+ Twitter")
- tvl: TVL, funding raised or market metrics if relevant (e.g. "$180M TVL", "$50M Series A")

Also write one summary paragraph that assesses the project's partnership potential and positioning, highlights the most promising opportunities, suggests next steps for approaching the partners, and notes challenges to consider.

Respond with valid JSON in exactly this format:
{shape}"#,
        name = input.name,
        description = input.description,
        stage = input.stage,
        funding_stage = input.funding_stage,
        categories = input.categories.join(", "),
        count = PARTNERS_PER_RESULT,
        shape = RESPONSE_SHAPE,
    )
}
